use std::sync::Arc;

mod app;
mod config;
mod db;
mod questions;
mod state;
mod users;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "lexiquiz=debug,axum=info,tower_http=info".to_string());
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

    let config = Arc::new(AppConfig::from_env()?);
    let pool = db::connect(&config).await?;

    if let Err(e) = db::migrate(&pool).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    let server = config.server.clone();
    let app = app::build_app(AppState::from_pool(config, pool));
    app::serve(app, &server).await
}
