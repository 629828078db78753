use anyhow::{Context, Result};
use seoblog::{app_state::AppState, config::Config, router::build_router};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    if config.gemini_api_key().is_empty() {
        warn!("GEMINI_API_KEY is not set; generation requests will fail");
    }

    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr()))?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app).await?;
    Ok(())
}
