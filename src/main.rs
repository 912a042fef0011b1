mod app;
mod config;
mod error;
mod extract;
mod pages;
mod state;
mod users;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "housing=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let (host, port) = (config.host.clone(), config.port);

    let app_state = match AppState::init(config).await {
        Ok(s) => s,
        Err(e) => {
            let detail = format!("{e:#}");
            tracing::error!(error = %detail, "database unavailable; refusing to start");
            return Err(e);
        }
    };

    let app = app::build_app(app_state);
    app::serve(app, &host, port).await
}
