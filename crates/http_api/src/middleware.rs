use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{errors::HttpError, state::HttpState};

pub const CRON_SECRET_HEADER: &str = "x-cron-secret";

/// Scheduled triggers mutate billing state; only the scheduler that holds the
/// shared secret may invoke them.
pub async fn require_cron_secret(
    State(state): State<HttpState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    let secret = req
        .headers()
        .get(CRON_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if secret != Some(state.cron_secret.as_str()) {
        return Err(HttpError::new(
            StatusCode::UNAUTHORIZED,
            "missing or invalid cron secret",
            Some("unauthorized".to_string()),
        ));
    }
    Ok(next.run(req).await)
}
