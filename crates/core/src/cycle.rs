use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates::add_months;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CycleError {
    #[error("unsupported cycle type: {0}")]
    UnsupportedCycleType(String),
}

/// Billing cadence category. Stored as uppercase text; anything outside the
/// three variants fails to parse, which is what isolates a malformed row to a
/// single batch item instead of aborting a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleType {
    Daily,
    Monthly,
    Custom,
}

impl FromStr for CycleType {
    type Err = CycleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Self::Daily),
            "MONTHLY" => Ok(Self::Monthly),
            "CUSTOM" => Ok(Self::Custom),
            other => Err(CycleError::UnsupportedCycleType(other.to_string())),
        }
    }
}

impl std::fmt::Display for CycleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "DAILY"),
            Self::Monthly => write!(f, "MONTHLY"),
            Self::Custom => write!(f, "CUSTOM"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalCalculation {
    pub new_start_date: NaiveDate,
    pub new_end_date: NaiveDate,
    pub days_extended: i64,
}

/// Compute the next billing window from the current end date. The new window
/// starts where the old one ended; its end depends on the cycle:
/// DAILY advances one day, MONTHLY advances `cycle_in_months` calendar months
/// (month-end preserving), CUSTOM advances `cycle_days` days and falls back to
/// the MONTHLY rule when `cycle_days` is absent or zero.
pub fn calculate_next_renewal_dates(
    current_end_date: NaiveDate,
    cycle_type: CycleType,
    cycle_in_months: u32,
    cycle_days: Option<u32>,
) -> RenewalCalculation {
    let new_end_date = match cycle_type {
        CycleType::Daily => current_end_date + Duration::days(1),
        CycleType::Monthly => add_months(current_end_date, cycle_in_months.max(1)),
        CycleType::Custom => match cycle_days {
            Some(days) if days > 0 => current_end_date + Duration::days(days as i64),
            _ => add_months(current_end_date, cycle_in_months.max(1)),
        },
    };
    RenewalCalculation {
        new_start_date: current_end_date,
        new_end_date,
        days_extended: (new_end_date - current_end_date).num_days(),
    }
}
