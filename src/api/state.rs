use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::services::{
    EnrichmentClient, FetchCoordinator, MetadataProvider, RecommendationEngine, TmdbProvider,
};

/// Request limits and catalog location read by the handlers
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub catalog_dir: PathBuf,
    pub default_recommendations: usize,
    pub max_recommendations: usize,
}

impl From<&Config> for ApiSettings {
    fn from(config: &Config) -> Self {
        Self {
            catalog_dir: config.catalog_dir.clone(),
            default_recommendations: config.default_recommendations,
            max_recommendations: config.max_recommendations,
        }
    }
}

/// Shared application state
///
/// The catalog sits behind a lock only so it can be swapped by an explicit
/// reload; requests take an `Arc` snapshot and never hold the lock while
/// ranking or enriching.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<RwLock<Arc<Catalog>>>,
    pub engine: RecommendationEngine,
    pub settings: Arc<ApiSettings>,
}

impl AppState {
    pub fn new(catalog: Catalog, engine: RecommendationEngine, settings: ApiSettings) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(Arc::new(catalog))),
            engine,
            settings: Arc::new(settings),
        }
    }

    /// Wires the enrichment pipeline around an arbitrary metadata provider
    pub fn with_provider(
        config: &Config,
        catalog: Catalog,
        provider: Arc<dyn MetadataProvider>,
    ) -> Self {
        let client = EnrichmentClient::from_config(provider, config);
        let coordinator = FetchCoordinator::new(client, config.max_concurrent_fetches);
        Self::new(
            catalog,
            RecommendationEngine::new(coordinator),
            ApiSettings::from(config),
        )
    }

    /// Production wiring against TMDB
    pub fn from_config(config: &Config, catalog: Catalog) -> Self {
        let provider = TmdbProvider::new(config.tmdb_api_key.clone(), config.tmdb_api_url.clone());
        Self::with_provider(config, catalog, Arc::new(provider))
    }

    /// Current catalog snapshot
    pub async fn catalog(&self) -> Arc<Catalog> {
        self.catalog.read().await.clone()
    }

    /// Swaps in a freshly loaded catalog; requests already running keep the old one
    pub async fn replace_catalog(&self, catalog: Catalog) {
        *self.catalog.write().await = Arc::new(catalog);
    }
}
