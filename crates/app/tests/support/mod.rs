#![allow(dead_code)]

use chrono::NaiveDate;
use subtrack_app::{AppConfig, AppState};
use subtrack_core::{Profile, Subscription, SubscriptionInput};
use tempfile::TempDir;

pub const NOW: &str = "2025-07-01T00:00:00.000Z";

pub struct TestApp {
    pub _dir: TempDir,
    pub state: AppState,
}

pub fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = AppConfig::new(dir.path().join("subtrack.sqlite"));
    let state = AppState::new(config);
    state.setup_db().expect("setup db");
    TestApp { _dir: dir, state }
}

pub fn date(value: &str) -> NaiveDate {
    value.parse().expect("date")
}

pub fn make_input(
    user_id: &str,
    name: &str,
    start: &str,
    end: &str,
    cycle_type: &str,
    cycle_in_months: u32,
) -> SubscriptionInput {
    SubscriptionInput {
        user_id: user_id.to_string(),
        name: name.to_string(),
        currency: "USD".to_string(),
        price: 9.99,
        start_date: date(start),
        end_date: date(end),
        cycle_type: cycle_type.to_string(),
        cycle_in_months,
        cycle_days: None,
        is_active: true,
    }
}

pub fn insert(state: &AppState, input: &SubscriptionInput) -> Subscription {
    state
        .open_db()
        .expect("open db")
        .insert_subscription(input, NOW)
        .expect("insert subscription")
}

pub fn insert_profile(state: &AppState, user_id: &str, email: &str) -> Profile {
    state
        .open_db()
        .expect("open db")
        .upsert_profile(user_id, user_id, email, "USD", NOW)
        .expect("upsert profile")
}

pub fn bump_counter(state: &AppState, id: i64, times: u32) {
    let mut db = state.open_db().expect("open db");
    for _ in 0..times {
        db.increment_email_counters(&[id], NOW).expect("bump counter");
    }
}

pub fn reload(state: &AppState, id: i64) -> Subscription {
    state
        .open_db()
        .expect("open db")
        .get_subscription(id)
        .expect("get subscription")
        .expect("subscription exists")
}
