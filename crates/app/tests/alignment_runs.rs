mod support;

use support::{bump_counter, date, insert, make_input, reload, setup_app};

#[test]
fn snaps_a_drifted_monthly_window_to_the_calendar_month() {
    let app = setup_app();
    let drifted = insert(
        &app.state,
        &make_input("u1", "drifted", "2025-01-15", "2025-02-15", "MONTHLY", 1),
    );
    bump_counter(&app.state, drifted.id, 1);

    let summary = app
        .state
        .services
        .alignment
        .run_at(date("2025-01-20"))
        .expect("run");

    assert_eq!(summary.checked, 1);
    assert_eq!(summary.aligned, 1);
    assert_eq!(summary.already_aligned, 0);

    let snapped = reload(&app.state, drifted.id);
    assert_eq!(snapped.start_date, date("2025-01-01"));
    assert_eq!(snapped.end_date, date("2025-02-01"));
    assert_eq!(snapped.number_email_sent, 0);
}

#[test]
fn second_run_in_the_same_period_changes_nothing() {
    let app = setup_app();
    insert(
        &app.state,
        &make_input("u1", "drifted", "2025-01-15", "2025-02-15", "MONTHLY", 1),
    );

    app.state
        .services
        .alignment
        .run_at(date("2025-01-20"))
        .expect("first run");
    let summary = app
        .state
        .services
        .alignment
        .run_at(date("2025-01-20"))
        .expect("second run");

    assert_eq!(summary.aligned, 0);
    assert_eq!(summary.already_aligned, 1);
}

#[test]
fn yearly_cycle_snaps_to_the_calendar_year() {
    let app = setup_app();
    let yearly = insert(
        &app.state,
        &make_input("u1", "yearly", "2025-03-10", "2026-03-10", "MONTHLY", 12),
    );

    let summary = app
        .state
        .services
        .alignment
        .run_at(date("2025-06-15"))
        .expect("run");

    assert_eq!(summary.aligned, 1);
    let snapped = reload(&app.state, yearly.id);
    assert_eq!(snapped.start_date, date("2025-01-01"));
    assert_eq!(snapped.end_date, date("2026-01-01"));
}

#[test]
fn quarterly_cycles_are_not_candidates() {
    let app = setup_app();
    insert(
        &app.state,
        &make_input("u1", "quarterly", "2025-01-15", "2025-04-15", "MONTHLY", 3),
    );

    let summary = app
        .state
        .services
        .alignment
        .run_at(date("2025-01-20"))
        .expect("run");

    assert_eq!(summary.checked, 0);
    assert_eq!(summary.aligned, 0);
}
