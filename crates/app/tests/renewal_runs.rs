mod support;

use support::{bump_counter, date, insert, make_input, reload, setup_app};

#[test]
fn renews_due_and_overdue_subscriptions_in_one_pass() {
    let app = setup_app();
    let due = insert(
        &app.state,
        &make_input("u1", "due-today", "2025-06-01", "2025-07-01", "MONTHLY", 1),
    );
    let overdue = insert(
        &app.state,
        &make_input("u1", "overdue", "2025-05-28", "2025-06-28", "MONTHLY", 1),
    );
    let future = insert(
        &app.state,
        &make_input("u1", "future", "2025-07-01", "2025-08-01", "MONTHLY", 1),
    );

    let summary = app
        .state
        .services
        .renewal
        .run_at(date("2025-07-01"))
        .expect("run");

    assert_eq!(summary.checked, 3);
    assert_eq!(summary.due, 2);
    assert_eq!(summary.renewed, 2);
    assert_eq!(summary.failed, 0);

    let renewed = reload(&app.state, due.id);
    assert_eq!(renewed.start_date, date("2025-07-01"));
    assert_eq!(renewed.end_date, date("2025-08-01"));

    let recovered = reload(&app.state, overdue.id);
    assert_eq!(recovered.start_date, date("2025-06-28"));
    assert_eq!(recovered.end_date, date("2025-07-28"));

    let untouched = reload(&app.state, future.id);
    assert_eq!(untouched.end_date, date("2025-08-01"));
}

#[test]
fn clears_stale_reminder_counters_before_scanning() {
    let app = setup_app();
    let fresh_window = insert(
        &app.state,
        &make_input("u1", "fresh", "2025-07-01", "2025-08-01", "MONTHLY", 1),
    );
    bump_counter(&app.state, fresh_window.id, 1);

    let summary = app
        .state
        .services
        .renewal
        .run_at(date("2025-07-01"))
        .expect("run");

    assert_eq!(summary.email_counters_reset, 1);
    assert_eq!(reload(&app.state, fresh_window.id).number_email_sent, 0);
}

#[test]
fn malformed_cycle_fails_alone_without_aborting_the_batch() {
    let app = setup_app();
    let good_a = insert(
        &app.state,
        &make_input("u1", "good-a", "2025-06-01", "2025-07-01", "MONTHLY", 1),
    );
    let bad = insert(
        &app.state,
        &make_input("u1", "bad", "2025-06-24", "2025-07-01", "WEEKLY", 1),
    );
    let good_b = insert(
        &app.state,
        &make_input("u2", "good-b", "2025-06-01", "2025-07-01", "MONTHLY", 1),
    );

    let summary = app
        .state
        .services
        .renewal
        .run_at(date("2025-07-01"))
        .expect("run");

    assert_eq!(summary.due, 3);
    assert_eq!(summary.renewed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].id, bad.id);
    assert!(summary.errors[0].error.contains("WEEKLY"));

    assert_eq!(reload(&app.state, good_a.id).end_date, date("2025-08-01"));
    assert_eq!(reload(&app.state, good_b.id).end_date, date("2025-08-01"));
    // The malformed row keeps its old window for the next run to retry.
    assert_eq!(reload(&app.state, bad.id).end_date, date("2025-07-01"));
}

#[test]
fn custom_cycle_extends_by_cycle_days() {
    let app = setup_app();
    let mut input = make_input("u1", "custom", "2025-05-17", "2025-07-01", "CUSTOM", 1);
    input.cycle_days = Some(45);
    let custom = insert(&app.state, &input);

    let summary = app
        .state
        .services
        .renewal
        .run_at(date("2025-07-01"))
        .expect("run");

    assert_eq!(summary.renewed, 1);
    assert_eq!(summary.renewals[0].days_extended, 45);
    assert_eq!(reload(&app.state, custom.id).end_date, date("2025-08-15"));
}
