use std::sync::Arc;

use chrono::NaiveDate;

use crate::app::AppConfig;
use crate::error::{AppError, Result};
use crate::mailer::{EmailTransport, ResendMailer, render_reminder_email};
use crate::services::{SharedConfig, open_db};
use crate::util::time::{now_utc_iso, today_utc};
use subtrack_core::{
    ReminderFailure, ReminderOutcome, ReminderRunSummary, ReminderTier, Subscription,
};
use subtrack_db::Db;

#[derive(Clone)]
pub struct ReminderService {
    config: SharedConfig,
    transport: Option<Arc<dyn EmailTransport>>,
}

impl ReminderService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Build a dispatcher over an injected transport instead of the
    /// configured Resend mailer.
    pub fn with_transport(config: &AppConfig, transport: Arc<dyn EmailTransport>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            transport: Some(transport),
        }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    fn transport(&self) -> Result<Arc<dyn EmailTransport>> {
        if let Some(transport) = &self.transport {
            return Ok(transport.clone());
        }
        let api_key = self.config.mailer.api_key.clone().ok_or_else(|| {
            AppError::InvalidInput("reminder mailer api key is not configured".to_string())
        })?;
        Ok(Arc::new(ResendMailer::new(
            api_key,
            self.config.mailer.from.clone(),
        )?))
    }

    pub fn run(&self) -> Result<ReminderRunSummary> {
        self.run_at(today_utc())
    }

    /// One reminder pass as of `today`. Candidates are grouped per owner and
    /// each owner gets a single email; counters advance only after the send
    /// succeeds, so a transport failure means the owner is retried by the
    /// next run rather than silently skipped.
    pub fn run_at(&self, today: NaiveDate) -> Result<ReminderRunSummary> {
        let mut db = self.db()?;
        let transport = self.transport()?;
        let mut summary = ReminderRunSummary {
            started_at: now_utc_iso(),
            ..ReminderRunSummary::default()
        };
        let candidates = db.list_reminder_candidates(today)?;
        summary.candidates = candidates.len();
        for (user_id, batch) in group_by_owner(candidates) {
            match notify_owner(&mut db, transport.as_ref(), &user_id, &batch) {
                Ok(outcome) => {
                    log::info!(
                        "reminded owner {} about {} subscription(s) at the {} tier",
                        outcome.user_id,
                        outcome.subscriptions,
                        outcome.tier
                    );
                    summary.owners_notified += 1;
                    summary.subscriptions_reminded += batch.len();
                    summary.sent.push(outcome);
                }
                Err(err) => {
                    log::warn!("reminder failed for owner {}: {}", user_id, err);
                    summary.owners_failed += 1;
                    summary.failures.push(ReminderFailure {
                        user_id,
                        subscriptions: batch.len(),
                        error: err.to_string(),
                    });
                }
            }
        }
        summary.finished_at = now_utc_iso();
        log::info!(
            "reminder run: {} candidates, {} owners notified, {} owners failed",
            summary.candidates,
            summary.owners_notified,
            summary.owners_failed
        );
        Ok(summary)
    }
}

/// Candidates arrive ordered by owner, so adjacent rows with the same
/// `user_id` form one batch.
fn group_by_owner(candidates: Vec<Subscription>) -> Vec<(String, Vec<Subscription>)> {
    let mut groups: Vec<(String, Vec<Subscription>)> = Vec::new();
    for subscription in candidates {
        match groups.last_mut() {
            Some((user_id, batch)) if *user_id == subscription.user_id => {
                batch.push(subscription);
            }
            _ => groups.push((subscription.user_id.clone(), vec![subscription])),
        }
    }
    groups
}

fn notify_owner(
    db: &mut Db,
    transport: &dyn EmailTransport,
    user_id: &str,
    batch: &[Subscription],
) -> Result<ReminderOutcome> {
    let profile = db
        .get_profile(user_id)?
        .ok_or_else(|| AppError::NotFound(format!("no profile for owner {user_id}")))?;
    // The most urgent candidate sets the tier for the whole batch.
    let counter = batch
        .iter()
        .map(|subscription| subscription.number_email_sent)
        .max()
        .unwrap_or(0);
    let tier = ReminderTier::from_counter(counter)
        .ok_or_else(|| AppError::Message(format!("reminder counter {counter} out of range")))?;
    let email = render_reminder_email(&profile.name, &profile.email, tier, batch);
    transport.send(&email)?;
    let ids: Vec<i64> = batch.iter().map(|subscription| subscription.id).collect();
    db.increment_email_counters(&ids, &now_utc_iso())?;
    Ok(ReminderOutcome {
        user_id: user_id.to_string(),
        email: profile.email,
        tier: tier.to_string(),
        subscriptions: batch.len(),
    })
}
