use chrono::{Datelike, NaiveDate};

/// Number of days in the given calendar month.
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = ymd(next_year, next_month, 1);
    (first_of_next - chrono::Duration::days(1)).day()
}

/// Add calendar months with month-end-preserving semantics: a date that is the
/// last day of its month lands on the last day of the target month, and a
/// day-of-month that does not exist in the target month clamps to its last day.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let was_last_day = date.day() == last_day_of_month(date.year(), date.month());
    let total = date.month0() + months;
    let year = date.year() + (total / 12) as i32;
    let month = total % 12 + 1;
    let last_day = last_day_of_month(year, month);
    let day = if was_last_day {
        last_day
    } else {
        date.day().min(last_day)
    };
    ymd(year, month, day)
}

/// First day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    ymd(date.year(), date.month(), 1)
}

/// January 1 of the year containing `date`.
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    ymd(date.year(), 1, 1)
}

/// Parse a stored date value as a calendar date, accepting both plain
/// `YYYY-MM-DD` strings and full RFC 3339 timestamps. Time-of-day is dropped
/// so comparisons never shift by a day across timezone representations.
pub fn parse_date_lenient(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    chrono::DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive())
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    // Callers only pass day values clamped to the month length.
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("date")
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(last_day_of_month(2025, 2), 28);
        assert_eq!(last_day_of_month(2024, 2), 29);
        assert_eq!(last_day_of_month(2000, 2), 29);
        assert_eq!(last_day_of_month(1900, 2), 28);
        assert_eq!(last_day_of_month(2025, 12), 31);
    }

    #[test]
    fn add_months_preserves_month_end() {
        assert_eq!(add_months(d(2025, 1, 31), 1), d(2025, 2, 28));
        assert_eq!(add_months(d(2024, 1, 31), 1), d(2024, 2, 29));
        assert_eq!(add_months(d(2025, 2, 28), 1), d(2025, 3, 31));
        assert_eq!(add_months(d(2025, 3, 31), 1), d(2025, 4, 30));
        assert_eq!(add_months(d(2025, 4, 30), 1), d(2025, 5, 31));
    }

    #[test]
    fn add_months_clamps_missing_days() {
        // Jan 30 is not month-end, but Feb has no 30th.
        assert_eq!(add_months(d(2025, 1, 30), 1), d(2025, 2, 28));
        assert_eq!(add_months(d(2024, 1, 30), 1), d(2024, 2, 29));
        // Mid-month days pass through untouched.
        assert_eq!(add_months(d(2025, 1, 15), 1), d(2025, 2, 15));
    }

    #[test]
    fn add_months_crosses_year_boundaries() {
        assert_eq!(add_months(d(2025, 11, 15), 3), d(2026, 2, 15));
        assert_eq!(add_months(d(2025, 1, 31), 12), d(2026, 1, 31));
        assert_eq!(add_months(d(2024, 2, 29), 12), d(2025, 2, 28));
    }

    #[test]
    fn month_end_preserved_for_every_start_month() {
        for month in 1..=12 {
            let last = last_day_of_month(2025, month);
            let result = add_months(d(2025, month, last), 1);
            assert_eq!(
                result.day(),
                last_day_of_month(result.year(), result.month()),
                "month {} end not preserved",
                month
            );
        }
    }

    #[test]
    fn parse_date_lenient_accepts_both_forms() {
        assert_eq!(parse_date_lenient("2025-01-15").expect("date"), d(2025, 1, 15));
        assert_eq!(
            parse_date_lenient("2025-01-15T10:30:00Z").expect("date"),
            d(2025, 1, 15)
        );
        assert_eq!(
            parse_date_lenient("2025-01-15T23:59:59+02:00").expect("date"),
            d(2025, 1, 15)
        );
        assert!(parse_date_lenient("not-a-date").is_err());
    }

    #[test]
    fn period_starts() {
        assert_eq!(start_of_month(d(2025, 7, 19)), d(2025, 7, 1));
        assert_eq!(start_of_year(d(2025, 7, 19)), d(2025, 1, 1));
    }
}
