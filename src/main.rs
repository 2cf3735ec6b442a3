use std::sync::Arc;

use alice_display_api::{
    api::{create_router, AppState},
    config::{CatalogSource, Config},
    models::ContextDefaults,
    services::{
        catalog::{JsonFileCatalog, NotionCatalog},
        ImageCatalog,
    },
};
use tracing_subscriber::EnvFilter;

fn build_catalog(source: CatalogSource) -> anyhow::Result<Arc<dyn ImageCatalog>> {
    let catalog: Arc<dyn ImageCatalog> = match source {
        CatalogSource::Notion {
            api_key,
            api_url,
            api_version,
            database_id,
            page_size,
            timeout,
        } => Arc::new(NotionCatalog::new(
            api_key,
            api_url,
            api_version,
            database_id,
            page_size,
            timeout,
        )?),
        CatalogSource::File(path) => Arc::new(JsonFileCatalog::new(path)),
    };
    Ok(catalog)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("alice_display_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let catalog = build_catalog(config.catalog_source()?)?;

    tracing::info!(catalog = catalog.name(), "Image catalog configured");

    let state = AppState::new(
        catalog,
        ContextDefaults {
            weather: config.default_weather.clone(),
            time_period: config.default_time_period.clone(),
        },
    );
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
