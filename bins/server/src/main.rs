//! Filebay API Server
//!
//! Main entry point for the Filebay backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filebay_api::{AppState, create_router};
use filebay_core::storage::OpendalStore;
use filebay_db::connect;
use filebay_shared::{AppConfig, TokenVerifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filebay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database).await?;
    info!("Connected to database");

    // Object storage adapter
    let storage = OpendalStore::from_config(&config.storage)?;
    info!(provider = config.storage.provider.name(), "Storage configured");

    // Token verifier; tokens are minted by the external identity provider
    let verifier = TokenVerifier::new(&config.auth);

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        verifier: Arc::new(verifier),
        storage: Arc::new(storage),
        retention_days: config.retention.days,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
