use doflow::{
    api::{chat, start_server},
    config::{Config, DEFAULT_CHAT_PORT},
    ChatService,
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

    let config = Config::from_env(DEFAULT_CHAT_PORT)?;

    info!("🤖 Do-Flow Chat Assistant");
    info!("📍 Port: {}", config.port);

    let router = chat::create_router(ChatService::default(), config.cors_permissive);

    info!("📡 Starting chat server...");
    start_server(router, &config.bind_address()).await?;

    Ok(())
}
