use anyhow::Context;
use tracing_subscriber::EnvFilter;

use reelmatch_api::{
    api::{create_router, AppState},
    catalog::load_catalog,
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Enrichment cannot run without an API key, so config errors are fatal
    let config = Config::from_env()?;

    let catalog = load_catalog(config.catalog_dir.clone())
        .await
        .with_context(|| {
            format!("Failed to load catalog from {}", config.catalog_dir.display())
        })?;

    let state = AppState::from_config(&config, catalog);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
