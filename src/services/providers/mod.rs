/// Movie metadata provider abstraction
///
/// Enrichment only needs two lookups per movie: the poster path from the
/// movie's details and the list of associated videos. Keeping them behind a
/// trait lets the enrichment layer be exercised without a live API.
use crate::{
    error::AppResult,
    models::{MovieId, TmdbVideo},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for remote movie metadata sources
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the poster path for a movie
    ///
    /// `Ok(None)` means the movie exists but has no poster.
    async fn fetch_poster_path(&self, movie_id: MovieId) -> AppResult<Option<String>>;

    /// Fetch the videos attached to a movie, in the order the provider lists them
    ///
    /// Malformed entries are dropped rather than failing the whole list.
    async fn fetch_videos(&self, movie_id: MovieId) -> AppResult<Vec<TmdbVideo>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
