#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use subtrack_core::{Profile, Subscription, SubscriptionInput};
use subtrack_db::Db;
use tempfile::TempDir;

pub const NOW: &str = "2025-07-01T00:00:00.000Z";

pub struct TestDb {
    pub _dir: TempDir,
    pub db: Db,
    pub path: PathBuf,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("test.sqlite");
    let mut db = Db::open(&path).expect("open db");
    db.migrate().expect("migrate db");
    TestDb {
        _dir: dir,
        db,
        path,
    }
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

pub fn insert(db: &Db, input: &SubscriptionInput) -> Subscription {
    db.insert_subscription(input, NOW).expect("insert subscription")
}

pub fn insert_profile(db: &Db, user_id: &str, email: &str) -> Profile {
    db.upsert_profile(user_id, user_id, email, "USD", NOW)
        .expect("upsert profile")
}
