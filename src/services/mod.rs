pub mod coordinator;
pub mod enrichment;
pub mod providers;
pub mod recommendations;

pub use coordinator::FetchCoordinator;
pub use enrichment::EnrichmentClient;
pub use providers::{MetadataProvider, TmdbProvider};
pub use recommendations::RecommendationEngine;
