use std::sync::Arc;

mod app;
mod config;
mod employees;
mod error;
mod state;

use crate::config::{AppConfig, Environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Arc::new(AppConfig::from_env()?);

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "payroll_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(config.environment == Environment::Production);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init(config.clone()).await?;

    // Run migrations if present
    if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    tracing::info!(environment = ?config.environment, "starting payroll api");
    let app = app::build_app(app_state)?;
    app::serve(app, &config).await
}
