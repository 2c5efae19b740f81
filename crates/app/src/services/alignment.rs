use chrono::NaiveDate;

use crate::error::Result;
use crate::services::{SharedConfig, open_db};
use crate::util::time::{now_utc_iso, today_utc};
use subtrack_core::{
    Alignment, AlignmentOutcome, AlignmentRunSummary, BatchItemError, CycleType,
    evaluate_alignment,
};
use subtrack_db::Db;

#[derive(Clone)]
pub struct AlignmentService {
    config: SharedConfig,
}

impl AlignmentService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn run(&self) -> Result<AlignmentRunSummary> {
        self.run_at(today_utc())
    }

    /// Snap drifted monthly and yearly windows to their calendar period as of
    /// `reference`. Evaluation is idempotent within a period, so repeated runs
    /// leave already-snapped windows alone.
    pub fn run_at(&self, reference: NaiveDate) -> Result<AlignmentRunSummary> {
        let db = self.db()?;
        let mut summary = AlignmentRunSummary {
            started_at: now_utc_iso(),
            ..AlignmentRunSummary::default()
        };
        let candidates = db.list_alignable_subscriptions()?;
        summary.checked = candidates.len();
        for subscription in candidates {
            match align_one(&db, &subscription, reference) {
                Ok(Some(outcome)) => {
                    log::info!(
                        "aligned {} (id {}) to {}..{}",
                        outcome.name,
                        outcome.id,
                        outcome.new_start_date,
                        outcome.new_end_date
                    );
                    summary.aligned += 1;
                    summary.alignments.push(outcome);
                }
                Ok(None) => summary.already_aligned += 1,
                Err(err) => {
                    log::warn!(
                        "alignment failed for {} (id {}): {}",
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
            "alignment run: {} checked, {} aligned, {} already aligned, {} failed",
            summary.checked,
            summary.aligned,
            summary.already_aligned,
            summary.failed
        );
        Ok(summary)
    }
}

fn align_one(
    db: &Db,
    subscription: &subtrack_core::Subscription,
    reference: NaiveDate,
) -> Result<Option<AlignmentOutcome>> {
    let cycle: CycleType = subscription.cycle_type.parse()?;
    let window = match evaluate_alignment(
        cycle,
        subscription.cycle_in_months,
        subscription.start_date,
        subscription.end_date,
        reference,
    ) {
        Alignment::NotApplicable | Alignment::Aligned => return Ok(None),
        Alignment::Needed(window) => window,
    };
    let aligned_at = now_utc_iso();
    db.replace_window(subscription.id, window.start, window.end, &aligned_at)?;
    Ok(Some(AlignmentOutcome {
        id: subscription.id,
        name: subscription.name.clone(),
        user_id: subscription.user_id.clone(),
        cycle_type: subscription.cycle_type.clone(),
        cycle_in_months: subscription.cycle_in_months,
        previous_start_date: subscription.start_date,
        previous_end_date: subscription.end_date,
        new_start_date: window.start,
        new_end_date: window.end,
        aligned_at,
    }))
}
