use doflow::{
    api::{finance, start_server},
    config::{Config, DEFAULT_API_PORT},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env(DEFAULT_API_PORT)?;

    info!("🚀 Do-Flow Backend API");
    info!("📍 Port: {}", config.port);
    if config.require_auth {
        info!("🔒 Bearer token required on every resource route");
    }

    let state = finance::build_state(&config).await?;
    let router = finance::create_router(state, config.cors_permissive);

    info!("📡 Starting API server...");
    start_server(router, &config.bind_address()).await?;

    Ok(())
}
