use chrono::NaiveDate;

use crate::error::Result;
use crate::services::{SharedConfig, open_db};
use crate::util::time::{now_utc_iso, today_utc};
use subtrack_core::{
    BatchItemError, CycleType, RenewalOutcome, RenewalRunSummary, Subscription,
    calculate_next_renewal_dates,
};
use subtrack_db::Db;

#[derive(Clone)]
pub struct RenewalService {
    config: SharedConfig,
}

impl RenewalService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn run(&self) -> Result<RenewalRunSummary> {
        self.run_at(today_utc())
    }

    /// One reconciliation pass as of `today`. Stale reminder counters are
    /// cleared first so a window opened by an earlier pass starts clean. The
    /// due scan includes past end dates, so items skipped by a failed run are
    /// picked up by the next one.
    pub fn run_at(&self, today: NaiveDate) -> Result<RenewalRunSummary> {
        let db = self.db()?;
        let mut summary = RenewalRunSummary {
            started_at: now_utc_iso(),
            ..RenewalRunSummary::default()
        };
        summary.checked = db.count_active_subscriptions()?;
        summary.email_counters_reset = db.reset_stale_email_counters(today, &now_utc_iso())?;
        let due = db.list_due_subscriptions(today)?;
        summary.due = due.len();
        for subscription in due {
            match renew_one(&db, &subscription) {
                Ok(outcome) => {
                    log::info!(
                        "renewed {} (id {}) until {}",
                        outcome.name,
                        outcome.id,
                        outcome.new_end_date
                    );
                    summary.renewed += 1;
                    summary.renewals.push(outcome);
                }
                Err(err) => {
                    log::warn!(
                        "renewal failed for {} (id {}): {}",
                        subscription.name,
                        subscription.id,
                        err
                    );
                    summary.failed += 1;
                    summary.errors.push(BatchItemError {
                        id: subscription.id,
                        name: subscription.name.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
        summary.finished_at = now_utc_iso();
        log::info!(
            "renewal run: {} checked, {} due, {} renewed, {} failed",
            summary.checked,
            summary.due,
            summary.renewed,
            summary.failed
        );
        Ok(summary)
    }
}

fn renew_one(db: &Db, subscription: &Subscription) -> Result<RenewalOutcome> {
    let cycle: CycleType = subscription.cycle_type.parse()?;
    let calc = calculate_next_renewal_dates(
        subscription.end_date,
        cycle,
        subscription.cycle_in_months,
        subscription.cycle_days,
    );
    let renewed_at = now_utc_iso();
    db.replace_window(
        subscription.id,
        calc.new_start_date,
        calc.new_end_date,
        &renewed_at,
    )?;
    Ok(RenewalOutcome {
        id: subscription.id,
        name: subscription.name.clone(),
        user_id: subscription.user_id.clone(),
        cycle_type: subscription.cycle_type.clone(),
        previous_end_date: subscription.end_date,
        new_start_date: calc.new_start_date,
        new_end_date: calc.new_end_date,
        days_extended: calc.days_extended,
        renewed_at,
    })
}
