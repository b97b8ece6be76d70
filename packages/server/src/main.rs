use anyhow::Context;
use tracing::{Level, info, warn};

use filwp_server::config::AppConfig;
use filwp_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let agent_enabled = config.agent.enabled;

    let state = AppState::from_config(config).await?;

    // A failed build is logged here and retried on the first request.
    if agent_enabled {
        match state.agent.get().await {
            Ok(_) => info!("Agent initialized"),
            Err(e) => warn!(error = %e, "Agent unavailable"),
        }
    }

    let app = filwp_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
