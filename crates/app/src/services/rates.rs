use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::app::AppConfig;
use crate::error::Result;
use crate::rate_source::{FxRateSource, RateSource};
use crate::services::{SharedConfig, open_db};
use crate::util::time::now_utc_iso;
use subtrack_core::{
    RateHistoryRecord, RateRecord, RateRefreshSummary, RateSnapshotInfo, RateStatistics,
    convert_amount,
};
use subtrack_db::Db;

const HISTORY_SOURCE: &str = "cron";

#[derive(Clone)]
pub struct RatesService {
    config: SharedConfig,
    source: Option<Arc<dyn RateSource>>,
}

impl RatesService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// Build a rate engine over an injected source instead of the configured
    /// HTTP endpoint.
    pub fn with_source(config: &AppConfig, source: Arc<dyn RateSource>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            source: Some(source),
        }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    fn source(&self) -> Result<Arc<dyn RateSource>> {
        if let Some(source) = &self.source {
            return Ok(source.clone());
        }
        Ok(Arc::new(FxRateSource::new(
            self.config.rates.endpoint.clone(),
        )?))
    }

    /// Fetch a fresh rate set, append the whole set to the audit history,
    /// then merge it into the live table under the keep-higher policy. A
    /// fetch failure aborts before anything is written.
    pub fn refresh(&self) -> Result<RateRefreshSummary> {
        let source = self.source()?;
        let mut db = self.db()?;
        let mut summary = RateRefreshSummary {
            base: self.config.rates.base.clone(),
            source: HISTORY_SOURCE.to_string(),
            started_at: now_utc_iso(),
            ..RateRefreshSummary::default()
        };
        let fetched = source.fetch(&self.config.rates.base)?;
        summary.fetched = fetched.rates.len();
        let now = now_utc_iso();
        summary.stored_in_history =
            db.append_rate_history(&fetched.rates, HISTORY_SOURCE, &now)?;
        let stats = db.merge_rates(&fetched.rates, &now)?;
        summary.updated = stats.updated;
        summary.unchanged = stats.unchanged;
        summary.finished_at = now_utc_iso();
        log::info!(
            "rate refresh: {} fetched, {} updated, {} unchanged (base {})",
            summary.fetched,
            summary.updated,
            summary.unchanged,
            summary.base
        );
        Ok(summary)
    }

    pub fn convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
        decimal_places: Option<u32>,
    ) -> Result<f64> {
        let db = self.db()?;
        let rates = db.list_rates()?;
        Ok(convert_amount(amount, from, to, &rates, decimal_places)?)
    }

    pub fn list(&self) -> Result<Vec<RateRecord>> {
        Ok(self.db()?.list_rates()?)
    }

    pub fn latest_snapshot(&self) -> Result<Vec<RateHistoryRecord>> {
        Ok(self.db()?.latest_rate_snapshot()?)
    }

    pub fn history(&self, code: &str, limit: u32) -> Result<Vec<RateHistoryRecord>> {
        Ok(self.db()?.currency_history(code, limit)?)
    }

    pub fn history_range(
        &self,
        code: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<RateHistoryRecord>> {
        Ok(self.db()?.currency_history_range(code, start, end)?)
    }

    pub fn snapshots(&self, limit: u32) -> Result<Vec<RateSnapshotInfo>> {
        Ok(self.db()?.rate_snapshots(limit)?)
    }

    pub fn statistics(&self, code: &str, days: u32) -> Result<RateStatistics> {
        let cutoff = iso_days_ago(days);
        Ok(self.db()?.currency_statistics(code, &cutoff)?)
    }

    /// Drop audit rows older than `retain_days`. Returns how many were
    /// deleted; the live table is never touched.
    pub fn cleanup_history(&self, retain_days: u32) -> Result<usize> {
        let cutoff = iso_days_ago(retain_days);
        let deleted = self.db()?.cleanup_rate_history(&cutoff)?;
        log::info!("rate history cleanup: {} row(s) dropped", deleted);
        Ok(deleted)
    }
}

fn iso_days_ago(days: u32) -> String {
    (Utc::now() - Duration::days(days as i64))
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
