use subtrack_app::{AppError, Result};
use subtrack_core::{
    AlignmentRunSummary, RateHistoryRecord, RateRecord, RateRefreshSummary, RateSnapshotInfo,
    RateStatistics, ReminderRunSummary, RenewalRunSummary,
};

use crate::{
    AppContext, CleanupRequest, CleanupResponse, ConvertRequest, ConvertResponse, HistoryRequest,
    SnapshotsRequest, StatsRequest,
};

const DEFAULT_HISTORY_LIMIT: u32 = 30;
const DEFAULT_SNAPSHOT_LIMIT: u32 = 30;
const DEFAULT_STATS_DAYS: u32 = 30;
const DEFAULT_RETAIN_DAYS: u32 = 365;

fn require_code(code: &str) -> Result<&str> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::InvalidInput("currency code is required".to_string()));
    }
    Ok(code)
}

pub fn run_renewal(ctx: &AppContext) -> Result<RenewalRunSummary> {
    ctx.app_state.services.renewal.run()
}

pub fn run_alignment(ctx: &AppContext) -> Result<AlignmentRunSummary> {
    ctx.app_state.services.alignment.run()
}

pub fn run_reminders(ctx: &AppContext) -> Result<ReminderRunSummary> {
    ctx.app_state.services.reminders.run()
}

pub fn refresh_rates(ctx: &AppContext) -> Result<RateRefreshSummary> {
    ctx.app_state.services.rates.refresh()
}

pub fn convert(ctx: &AppContext, req: ConvertRequest) -> Result<ConvertResponse> {
    let from = require_code(&req.from)?.to_ascii_uppercase();
    let to = require_code(&req.to)?.to_ascii_uppercase();
    let converted = ctx
        .app_state
        .services
        .rates
        .convert(req.amount, &from, &to, req.decimal_places)?;
    Ok(ConvertResponse {
        amount: req.amount,
        from,
        to,
        converted,
    })
}

pub fn list_rates(ctx: &AppContext) -> Result<Vec<RateRecord>> {
    ctx.app_state.services.rates.list()
}

pub fn latest_snapshot(ctx: &AppContext) -> Result<Vec<RateHistoryRecord>> {
    ctx.app_state.services.rates.latest_snapshot()
}

/// Per-currency history: a time range when both bounds are given, otherwise
/// the most recent rows up to `limit`.
pub fn rate_history(ctx: &AppContext, req: HistoryRequest) -> Result<Vec<RateHistoryRecord>> {
    let code = require_code(&req.code)?;
    if let (Some(start), Some(end)) = (&req.start, &req.end) {
        return ctx.app_state.services.rates.history_range(code, start, end);
    }
    let limit = req.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    ctx.app_state.services.rates.history(code, limit)
}

pub fn rate_snapshots(ctx: &AppContext, req: SnapshotsRequest) -> Result<Vec<RateSnapshotInfo>> {
    let limit = req.limit.unwrap_or(DEFAULT_SNAPSHOT_LIMIT);
    ctx.app_state.services.rates.snapshots(limit)
}

pub fn rate_statistics(ctx: &AppContext, req: StatsRequest) -> Result<RateStatistics> {
    let code = require_code(&req.code)?;
    let days = req.days.unwrap_or(DEFAULT_STATS_DAYS);
    ctx.app_state.services.rates.statistics(code, days)
}

pub fn cleanup_history(ctx: &AppContext, req: CleanupRequest) -> Result<CleanupResponse> {
    let retain_days = req.retain_days.unwrap_or(DEFAULT_RETAIN_DAYS);
    let deleted = ctx.app_state.services.rates.cleanup_history(retain_days)?;
    Ok(CleanupResponse { deleted })
}
