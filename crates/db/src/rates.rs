use std::collections::BTreeMap;

use rusqlite::{OptionalExtension, params};
use subtrack_core::{RateHistoryRecord, RateMergeStats, RateRecord, RateSnapshotInfo, RateStatistics};

use crate::Db;
use crate::error::Result;
use crate::helpers::{row_to_rate, row_to_rate_history};

const HISTORY_COLUMNS: &str = "id, code, rate, source, created_at";

impl Db {
    pub fn list_rates(&self) -> Result<Vec<RateRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT code, rate, updated_at FROM rate ORDER BY code ASC")?;
        let rows = stmt
            .query_map([], row_to_rate)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_rate(&self, code: &str) -> Result<Option<RateRecord>> {
        self.conn
            .query_row(
                "SELECT code, rate, updated_at FROM rate WHERE code = ?1",
                params![code.to_ascii_uppercase()],
                row_to_rate,
            )
            .optional()
            .map_err(crate::error::DbError::from)
    }

    /// Merge a fetched rate set into the live table under the conservative
    /// policy: a stored rate is only ever replaced by a strictly higher one.
    /// All updates for a run commit together.
    pub fn merge_rates(&mut self, rates: &BTreeMap<String, f64>, now: &str) -> Result<RateMergeStats> {
        let tx = self.conn.transaction()?;
        let mut stats = RateMergeStats::default();
        {
            let mut select = tx.prepare("SELECT rate FROM rate WHERE code = ?1")?;
            let mut upsert = tx.prepare(
                r#"
                INSERT INTO rate (code, rate, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(code) DO UPDATE SET rate = excluded.rate, updated_at = excluded.updated_at
                "#,
            )?;
            for (code, new_rate) in rates {
                let code = code.to_ascii_uppercase();
                let existing: Option<f64> = select
                    .query_row(params![code], |row| row.get(0))
                    .optional()?;
                match existing {
                    Some(current) if *new_rate <= current => stats.unchanged += 1,
                    _ => {
                        upsert.execute(params![code, new_rate, now])?;
                        stats.updated += 1;
                    }
                }
            }
        }
        tx.commit()?;
        Ok(stats)
    }

    /// Append one history row per fetched code, all tagged with the same
    /// source and timestamp. The batch commits as a whole or not at all.
    pub fn append_rate_history(
        &mut self,
        rates: &BTreeMap<String, f64>,
        source: &str,
        created_at: &str,
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO rate_history (code, rate, source, created_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (code, rate) in rates {
                stmt.execute(params![code.to_ascii_uppercase(), rate, source, created_at])?;
                inserted += 1;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// All rows from the most recent fetch cycle.
    pub fn latest_rate_snapshot(&self) -> Result<Vec<RateHistoryRecord>> {
        let latest: Option<String> = self
            .conn
            .query_row("SELECT MAX(created_at) FROM rate_history", [], |row| {
                row.get(0)
            })?;
        let Some(latest) = latest else {
            return Ok(Vec::new());
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HISTORY_COLUMNS} FROM rate_history WHERE created_at = ?1 ORDER BY code ASC"
        ))?;
        let rows = stmt
            .query_map(params![latest], row_to_rate_history)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn currency_history(&self, code: &str, limit: u32) -> Result<Vec<RateHistoryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {HISTORY_COLUMNS} FROM rate_history
            WHERE code = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT ?2
            "#
        ))?;
        let rows = stmt
            .query_map(params![code.to_ascii_uppercase(), limit], row_to_rate_history)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn currency_history_range(
        &self,
        code: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<RateHistoryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {HISTORY_COLUMNS} FROM rate_history
            WHERE code = ?1 AND created_at >= ?2 AND created_at <= ?3
            ORDER BY created_at DESC, id DESC
            "#
        ))?;
        let rows = stmt
            .query_map(
                params![code.to_ascii_uppercase(), start, end],
                row_to_rate_history,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Distinct fetch cycles, newest first, with the number of rows each wrote.
    pub fn rate_snapshots(&self, limit: u32) -> Result<Vec<RateSnapshotInfo>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT created_at, COUNT(*) FROM rate_history
            GROUP BY created_at
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(RateSnapshotInfo {
                    timestamp: row.get(0)?,
                    count: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Min/max/avg over history rows at or after `cutoff`, plus the most
    /// recently recorded rate regardless of the cutoff.
    pub fn currency_statistics(&self, code: &str, cutoff: &str) -> Result<RateStatistics> {
        let code = code.to_ascii_uppercase();
        let (min, max, avg, record_count): (Option<f64>, Option<f64>, Option<f64>, i64) =
            self.conn.query_row(
                r#"
                SELECT MIN(rate), MAX(rate), AVG(rate), COUNT(*)
                FROM rate_history
                WHERE code = ?1 AND created_at >= ?2
                "#,
                params![code, cutoff],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;
        let current: Option<f64> = self
            .conn
            .query_row(
                r#"
                SELECT rate FROM rate_history
                WHERE code = ?1
                ORDER BY created_at DESC, id DESC
                LIMIT 1
                "#,
                params![code],
                |row| row.get(0),
            )
            .optional()?;
        Ok(RateStatistics {
            currency: code,
            current,
            min,
            max,
            avg,
            record_count,
        })
    }

    /// Drop history rows older than `cutoff`. The live table is untouched.
    pub fn cleanup_rate_history(&self, cutoff: &str) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM rate_history WHERE created_at < ?1",
            params![cutoff],
        )?;
        Ok(deleted)
    }
}
