pub mod alignment;
pub mod convert;
pub mod cycle;
pub mod dates;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use alignment::{Alignment, CanonicalWindow, evaluate_alignment};
pub use convert::{ConvertError, DECIMAL_PLACES, convert_amount, round_to_places};
pub use cycle::{CycleError, CycleType, RenewalCalculation, calculate_next_renewal_dates};
pub use dates::{add_months, last_day_of_month, parse_date_lenient, start_of_month, start_of_year};

/// Days before `end_date` at which the first reminder is sent (counter 0).
pub const REMINDER_FIRST_LEAD_DAYS: i64 = 7;
/// Days before `end_date` at which the final reminder is sent (counter 1).
pub const REMINDER_FINAL_LEAD_DAYS: i64 = 3;
/// No further reminders once the counter reaches this value.
pub const REMINDER_MAX_SENT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub currency: String,
    pub price: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cycle_type: String,
    pub cycle_in_months: u32,
    pub cycle_days: Option<u32>,
    pub number_email_sent: u32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionInput {
    pub user_id: String,
    pub name: String,
    pub currency: String,
    pub price: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub cycle_type: String,
    pub cycle_in_months: u32,
    pub cycle_days: Option<u32>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub currency: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One row per currency code in the live rate table, relative to a fixed base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub code: String,
    pub rate: f64,
    pub updated_at: String,
}

/// Append-only audit row; one per currency per fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateHistoryRecord {
    pub id: i64,
    pub code: String,
    pub rate: f64,
    pub source: String,
    pub created_at: String,
}

/// Reminder lead time, derived from the per-subscription send counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderTier {
    SevenDay,
    ThreeDay,
}

impl ReminderTier {
    pub fn from_counter(counter: u32) -> Option<Self> {
        match counter {
            0 => Some(Self::SevenDay),
            1 => Some(Self::ThreeDay),
            _ => None,
        }
    }

    pub fn lead_days(&self) -> i64 {
        match self {
            Self::SevenDay => REMINDER_FIRST_LEAD_DAYS,
            Self::ThreeDay => REMINDER_FINAL_LEAD_DAYS,
        }
    }
}

impl std::fmt::Display for ReminderTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SevenDay => write!(f, "7-day"),
            Self::ThreeDay => write!(f, "3-day"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemError {
    pub id: i64,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewalOutcome {
    pub id: i64,
    pub name: String,
    pub user_id: String,
    pub cycle_type: String,
    pub previous_end_date: NaiveDate,
    pub new_start_date: NaiveDate,
    pub new_end_date: NaiveDate,
    pub days_extended: i64,
    pub renewed_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenewalRunSummary {
    pub checked: usize,
    pub due: usize,
    pub renewed: usize,
    pub failed: usize,
    pub email_counters_reset: usize,
    pub renewals: Vec<RenewalOutcome>,
    pub errors: Vec<BatchItemError>,
    pub started_at: String,
    pub finished_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentOutcome {
    pub id: i64,
    pub name: String,
    pub user_id: String,
    pub cycle_type: String,
    pub cycle_in_months: u32,
    pub previous_start_date: NaiveDate,
    pub previous_end_date: NaiveDate,
    pub new_start_date: NaiveDate,
    pub new_end_date: NaiveDate,
    pub aligned_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlignmentRunSummary {
    pub checked: usize,
    pub aligned: usize,
    pub already_aligned: usize,
    pub failed: usize,
    pub alignments: Vec<AlignmentOutcome>,
    pub errors: Vec<BatchItemError>,
    pub started_at: String,
    pub finished_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderOutcome {
    pub user_id: String,
    pub email: String,
    pub tier: String,
    pub subscriptions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderFailure {
    pub user_id: String,
    pub subscriptions: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderRunSummary {
    pub candidates: usize,
    pub owners_notified: usize,
    pub owners_failed: usize,
    pub subscriptions_reminded: usize,
    pub sent: Vec<ReminderOutcome>,
    pub failures: Vec<ReminderFailure>,
    pub started_at: String,
    pub finished_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateMergeStats {
    pub updated: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateRefreshSummary {
    pub base: String,
    pub source: String,
    pub fetched: usize,
    pub stored_in_history: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub started_at: String,
    pub finished_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSnapshotInfo {
    pub timestamp: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateStatistics {
    pub currency: String,
    pub current: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub record_count: i64,
}
