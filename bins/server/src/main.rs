//! Ecclesia API Server
//!
//! Main entry point for the church fiscal reporting service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecclesia_api::{AppState, create_router};
use ecclesia_core::storage::{DocumentStore, StorageConfig};
use ecclesia_db::connect_with_pool;
use ecclesia_db::migration::{Migrator, MigratorTrait};
use ecclesia_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecclesia=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        ..JwtConfig::default()
    });

    let documents =
        DocumentStore::from_config(StorageConfig::new(config.documents.storage_provider()))?;
    info!(
        provider = documents.provider_name(),
        "Document storage configured"
    );

    if !config.documents.template_path.exists() {
        warn!(
            path = %config.documents.template_path.display(),
            "Form template not found; form-pdf downloads will be refused"
        );
    }

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        documents: Arc::new(documents),
        documents_config: Arc::new(config.documents.clone()),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
