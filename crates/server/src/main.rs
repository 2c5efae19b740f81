mod args;
mod config;

use std::io;
use std::net::SocketAddr;

use app_api::AppContext;
use http_api::{HttpState, generate_cron_secret};
use subtrack_app::{AppConfig, AppPaths, AppState, ensure_app_data_dir};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    let config = config::load_or_create().map_err(io::Error::other)?;
    if config.created {
        log::info!(
            "created config at {} (default port {})",
            config.file.display(),
            config.config.port
        );
    }

    let data_dir = config::resolve_data_dir().map_err(io::Error::other)?;
    let paths = AppPaths::new(data_dir.clone());
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;

    let mut app_config = AppConfig::new(paths.db_path);
    app_config.mailer.api_key = std::env::var("RESEND_API_KEY").ok();
    app_config.mailer.from = config.config.reminder_from.clone();
    app_config.rates.endpoint = config.config.rate_endpoint.clone();
    app_config.rates.base = config.config.rate_base.clone();
    if app_config.mailer.api_key.is_none() {
        log::warn!("RESEND_API_KEY is not set; reminder runs will fail until it is");
    }

    let app_state = AppState::new(app_config);
    app_state
        .setup_db()
        .map_err(|err| io::Error::other(format!("failed to initialize database: {err}")))?;

    let context = AppContext {
        app_state,
        app_data_dir: data_dir,
    };

    let cron_secret = match std::env::var("CRON_SECRET") {
        Ok(secret) if !secret.is_empty() => secret,
        _ => {
            let secret = generate_cron_secret();
            log::warn!("CRON_SECRET is not set; using generated secret {secret} for this run");
            secret
        }
    };

    let state = HttpState::new(context, cron_secret);
    let router = http_api::router(state);

    let port = args.port.unwrap_or(config.config.port);
    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    if used_fallback {
        log::warn!("configured port {port} was unavailable; using {actual_port} for this run");
    }
    log::info!("subtrack server listening on http://127.0.0.1:{actual_port}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
