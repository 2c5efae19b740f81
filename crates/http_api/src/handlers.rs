use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};

use app_api::{
    CleanupRequest, ConvertRequest, EmptyRequest, HistoryRequest, SnapshotsRequest, StatsRequest,
};

use crate::{errors::HttpError, state::HttpState};

/// Services block on SQLite and outbound HTTP, so every handler hops to the
/// blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, HttpError>
where
    F: FnOnce() -> subtrack_app::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| {
            HttpError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("blocking task failed: {err}"),
                None,
            )
        })?
        .map_err(HttpError::from)
}

pub async fn run_renewal(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::run_renewal(&context)).await?;
    Ok(Json(response))
}

pub async fn run_alignment(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::run_alignment(&context)).await?;
    Ok(Json(response))
}

pub async fn run_reminders(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::run_reminders(&context)).await?;
    Ok(Json(response))
}

pub async fn refresh_rates(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::refresh_rates(&context)).await?;
    Ok(Json(response))
}

pub async fn convert(
    State(state): State<HttpState>,
    Json(req): Json<ConvertRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::convert(&context, req)).await?;
    Ok(Json(response))
}

pub async fn list_rates(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::list_rates(&context)).await?;
    Ok(Json(response))
}

pub async fn latest_snapshot(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::latest_snapshot(&context)).await?;
    Ok(Json(response))
}

pub async fn rate_history(
    State(state): State<HttpState>,
    Json(req): Json<HistoryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::rate_history(&context, req)).await?;
    Ok(Json(response))
}

pub async fn rate_snapshots(
    State(state): State<HttpState>,
    Json(req): Json<SnapshotsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::rate_snapshots(&context, req)).await?;
    Ok(Json(response))
}

pub async fn rate_statistics(
    State(state): State<HttpState>,
    Json(req): Json<StatsRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::rate_statistics(&context, req)).await?;
    Ok(Json(response))
}

pub async fn cleanup_history(
    State(state): State<HttpState>,
    Json(req): Json<CleanupRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let context = state.context.clone();
    let response = run_blocking(move || app_api::cleanup_history(&context, req)).await?;
    Ok(Json(response))
}
