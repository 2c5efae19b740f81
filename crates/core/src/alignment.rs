use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cycle::CycleType;
use crate::dates::{add_months, start_of_month, start_of_year};

/// The calendar-period window a subscription should snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Cycle has no alignment concept (non-monthly, or a month count other
    /// than 1 or 12). Not an error.
    NotApplicable,
    /// Window already matches the canonical period for the reference date.
    Aligned,
    /// Window has drifted; the canonical window to write back.
    Needed(CanonicalWindow),
}

/// Decide whether a subscription window has drifted from the canonical period
/// boundary. Monthly cycles snap to the first of the month containing
/// `reference`, yearly cycles (12 months) to January 1 of its year. Running
/// the evaluation twice against the same reference period yields `Aligned`
/// the second time, so the snap is never double-applied.
pub fn evaluate_alignment(
    cycle_type: CycleType,
    cycle_in_months: u32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reference: NaiveDate,
) -> Alignment {
    let Some(canonical) = canonical_window(cycle_type, cycle_in_months, reference) else {
        return Alignment::NotApplicable;
    };
    if start_date == canonical.start && end_date == canonical.end {
        Alignment::Aligned
    } else {
        Alignment::Needed(canonical)
    }
}

fn canonical_window(
    cycle_type: CycleType,
    cycle_in_months: u32,
    reference: NaiveDate,
) -> Option<CanonicalWindow> {
    if cycle_type != CycleType::Monthly {
        return None;
    }
    match cycle_in_months {
        1 => {
            let start = start_of_month(reference);
            Some(CanonicalWindow {
                start,
                end: add_months(start, 1),
            })
        }
        12 => {
            let start = start_of_year(reference);
            Some(CanonicalWindow {
                start,
                end: add_months(start, 12),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("date")
    }

    #[test]
    fn mid_month_monthly_window_needs_alignment() {
        let result = evaluate_alignment(
            CycleType::Monthly,
            1,
            d(2025, 1, 15),
            d(2025, 2, 15),
            d(2025, 1, 20),
        );
        assert_eq!(
            result,
            Alignment::Needed(CanonicalWindow {
                start: d(2025, 1, 1),
                end: d(2025, 2, 1),
            })
        );
    }

    #[test]
    fn aligned_monthly_window_is_idempotent() {
        for day in [1, 15, 31] {
            let result = evaluate_alignment(
                CycleType::Monthly,
                1,
                d(2025, 1, 1),
                d(2025, 2, 1),
                d(2025, 1, day),
            );
            assert_eq!(result, Alignment::Aligned, "reference day {}", day);
        }
    }

    #[test]
    fn yearly_window_snaps_to_january_first() {
        let result = evaluate_alignment(
            CycleType::Monthly,
            12,
            d(2025, 3, 10),
            d(2026, 3, 10),
            d(2025, 6, 1),
        );
        assert_eq!(
            result,
            Alignment::Needed(CanonicalWindow {
                start: d(2025, 1, 1),
                end: d(2026, 1, 1),
            })
        );
    }

    #[test]
    fn aligned_yearly_window_stays_aligned_all_year() {
        let result = evaluate_alignment(
            CycleType::Monthly,
            12,
            d(2025, 1, 1),
            d(2026, 1, 1),
            d(2025, 11, 30),
        );
        assert_eq!(result, Alignment::Aligned);
    }

    #[test]
    fn other_cycles_are_not_applicable() {
        let window = (d(2025, 1, 15), d(2025, 2, 15));
        for (cycle, months) in [
            (CycleType::Daily, 1),
            (CycleType::Custom, 1),
            (CycleType::Monthly, 3),
            (CycleType::Monthly, 6),
        ] {
            let result = evaluate_alignment(cycle, months, window.0, window.1, d(2025, 1, 20));
            assert_eq!(result, Alignment::NotApplicable, "{:?}/{}", cycle, months);
        }
    }
}
