use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pantry_api::api::{create_router, AppState};
use pantry_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize application state
    let state = AppState::new();

    // Create the router with all routes
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start the server
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!(host = %config.host, port = config.port, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
