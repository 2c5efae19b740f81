use chrono::NaiveDate;
use rusqlite::Row;
use rusqlite::types::Type;
use subtrack_core::{Profile, RateHistoryRecord, RateRecord, Subscription, parse_date_lenient};

/// Columns selected by every subscription query, in row-mapper order.
pub(crate) const SUBSCRIPTION_COLUMNS: &str = "id, user_id, name, currency, price, start_date, \
     end_date, cycle_type, cycle_in_months, cycle_days, number_email_sent, is_active, \
     created_at, updated_at";

pub(crate) fn row_to_subscription(
    row: &Row<'_>,
) -> std::result::Result<Subscription, rusqlite::Error> {
    Ok(Subscription {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        currency: row.get(3)?,
        price: row.get(4)?,
        start_date: date_column(row, 5)?,
        end_date: date_column(row, 6)?,
        cycle_type: row.get(7)?,
        cycle_in_months: row.get::<_, i64>(8)? as u32,
        cycle_days: row.get::<_, Option<i64>>(9)?.map(|days| days as u32),
        number_email_sent: row.get::<_, i64>(10)? as u32,
        is_active: row.get::<_, i64>(11)? != 0,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

pub(crate) fn row_to_profile(row: &Row<'_>) -> std::result::Result<Profile, rusqlite::Error> {
    Ok(Profile {
        user_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        currency: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub(crate) fn row_to_rate(row: &Row<'_>) -> std::result::Result<RateRecord, rusqlite::Error> {
    Ok(RateRecord {
        code: row.get(0)?,
        rate: row.get(1)?,
        updated_at: row.get(2)?,
    })
}

pub(crate) fn row_to_rate_history(
    row: &Row<'_>,
) -> std::result::Result<RateHistoryRecord, rusqlite::Error> {
    Ok(RateHistoryRecord {
        id: row.get(0)?,
        code: row.get(1)?,
        rate: row.get(2)?,
        source: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Stored dates may be plain dates or full timestamps; either way the caller
/// gets a calendar date.
fn date_column(row: &Row<'_>, index: usize) -> std::result::Result<NaiveDate, rusqlite::Error> {
    let raw: String = row.get(index)?;
    parse_date_lenient(&raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}
