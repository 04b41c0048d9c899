use std::path::Path;

use anyhow::Context;
use tracing::info;

use momo_gateway::logging::init_logging;
use momo_gateway::{AppState, Config, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply
    let dotenv = dotenvy::dotenv().ok();
    let config = Config::from_env().context("failed to load configuration")?;

    init_logging(
        "info",
        config.log_format,
        config.log_file.as_deref().map(Path::new),
    )
    .context("failed to initialize logging")?;

    info!(
        env_file = ?dotenv,
        token_url = %config.credentials.token_url,
        api_endpoint = %config.credentials.api_endpoint,
        "configuration loaded"
    );

    let app_state = AppState::new(config).context("failed to build HTTP client")?;
    let bind_addr = app_state.config.bind_addr.clone();

    app_state
        .tokens()
        .ensure_valid()
        .await
        .context("failed to obtain initial access token")?;

    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;

    info!(addr = %bind_addr, "service starting");

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
