use chrono::{Duration, NaiveDate};
use rusqlite::{OptionalExtension, params};
use subtrack_core::{
    REMINDER_FINAL_LEAD_DAYS, REMINDER_FIRST_LEAD_DAYS, Subscription, SubscriptionInput,
};

use crate::Db;
use crate::error::Result;
use crate::helpers::{SUBSCRIPTION_COLUMNS, row_to_subscription};

impl Db {
    pub fn insert_subscription(&self, input: &SubscriptionInput, now: &str) -> Result<Subscription> {
        self.conn.execute(
            r#"
            INSERT INTO subscription (
              user_id, name, currency, price, start_date, end_date,
              cycle_type, cycle_in_months, cycle_days, number_email_sent,
              is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?11, ?11)
            "#,
            params![
                input.user_id,
                input.name,
                input.currency,
                input.price,
                input.start_date.to_string(),
                input.end_date.to_string(),
                input.cycle_type,
                input.cycle_in_months as i64,
                input.cycle_days.map(|days| days as i64),
                input.is_active as i64,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_subscription(id)?
            .ok_or_else(|| crate::error::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_subscription(&self, id: i64) -> Result<Option<Subscription>> {
        self.conn
            .query_row(
                &format!(
                    "SELECT {SUBSCRIPTION_COLUMNS} FROM subscription WHERE id = ?1"
                ),
                params![id],
                row_to_subscription,
            )
            .optional()
            .map_err(crate::error::DbError::from)
    }

    pub fn count_active_subscriptions(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM subscription WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Active subscriptions whose window has elapsed as of `today`. The scan
    /// is inclusive of past end dates so a missed scheduler run is recovered
    /// by the next one.
    pub fn list_due_subscriptions(&self, today: NaiveDate) -> Result<Vec<Subscription>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM subscription
            WHERE is_active = 1 AND date(end_date) <= ?1
            ORDER BY id ASC
            "#
        ))?;
        let rows = stmt
            .query_map(params![today.to_string()], row_to_subscription)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Active monthly subscriptions eligible for calendar alignment
    /// (one-month and twelve-month cycles only).
    pub fn list_alignable_subscriptions(&self) -> Result<Vec<Subscription>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM subscription
            WHERE is_active = 1 AND cycle_type = 'MONTHLY' AND cycle_in_months IN (1, 12)
            ORDER BY id ASC
            "#
        ))?;
        let rows = stmt
            .query_map([], row_to_subscription)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Active subscriptions eligible for a reminder as of `today`: inside the
    /// 7-day lead with no reminder sent yet, or inside the 3-day lead with
    /// exactly one sent.
    pub fn list_reminder_candidates(&self, today: NaiveDate) -> Result<Vec<Subscription>> {
        let first_cutoff = (today + Duration::days(REMINDER_FIRST_LEAD_DAYS)).to_string();
        let final_cutoff = (today + Duration::days(REMINDER_FINAL_LEAD_DAYS)).to_string();
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM subscription
            WHERE is_active = 1
              AND (
                (date(end_date) < ?1 AND number_email_sent = 0)
                OR (date(end_date) < ?2 AND number_email_sent = 1)
              )
            ORDER BY user_id ASC, id ASC
            "#
        ))?;
        let rows = stmt
            .query_map(params![first_cutoff, final_cutoff], row_to_subscription)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Atomically write a new billing window and reset the reminder counter.
    /// Used by both renewal and alignment; a partial update is never visible.
    pub fn replace_window(
        &self,
        id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        now: &str,
    ) -> Result<()> {
        self.conn.execute(
            r#"
            UPDATE subscription
            SET start_date = ?1, end_date = ?2, number_email_sent = 0, updated_at = ?3
            WHERE id = ?4
            "#,
            params![start_date.to_string(), end_date.to_string(), now, id],
        )?;
        Ok(())
    }

    /// Clear reminder counters left over from a previous window on
    /// subscriptions whose new window starts `today`. Returns how many rows
    /// were touched.
    pub fn reset_stale_email_counters(&self, today: NaiveDate, now: &str) -> Result<usize> {
        let updated = self.conn.execute(
            r#"
            UPDATE subscription
            SET number_email_sent = 0, updated_at = ?1
            WHERE is_active = 1 AND date(start_date) = ?2 AND number_email_sent > 0
            "#,
            params![now, today.to_string()],
        )?;
        Ok(updated)
    }

    /// Advance the reminder counter for every subscription in one owner's
    /// batch, all-or-nothing.
    pub fn increment_email_counters(&mut self, ids: &[i64], now: &str) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut updated = 0usize;
        {
            let mut stmt = tx.prepare(
                r#"
                UPDATE subscription
                SET number_email_sent = number_email_sent + 1, updated_at = ?1
                WHERE id = ?2
                "#,
            )?;
            for id in ids {
                updated += stmt.execute(params![now, id])?;
            }
        }
        tx.commit()?;
        Ok(updated)
    }
}
