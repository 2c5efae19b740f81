mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{Router, middleware as axum_middleware, routing::post};

pub use state::{HttpState, generate_cron_secret};

pub fn router(state: HttpState) -> Router<()> {
    let cron = Router::new()
        .route("/renewal", post(handlers::run_renewal))
        .route("/alignment", post(handlers::run_alignment))
        .route("/reminders", post(handlers::run_reminders))
        .route("/rates", post(handlers::refresh_rates))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_cron_secret,
        ));

    let api = Router::new()
        .route("/convert", post(handlers::convert))
        .route("/rates", post(handlers::list_rates))
        .route("/rates/latest", post(handlers::latest_snapshot))
        .route("/rates/history", post(handlers::rate_history))
        .route("/rates/snapshots", post(handlers::rate_snapshots))
        .route("/rates/stats", post(handlers::rate_statistics))
        .route("/rates/cleanup", post(handlers::cleanup_history));

    Router::new()
        .nest("/api", api)
        .nest("/cron", cron)
        .with_state(state)
}
