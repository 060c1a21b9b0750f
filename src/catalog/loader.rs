use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::{Catalog, CatalogError};
use crate::models::Movie;

pub const MOVIE_LIST_FILE: &str = "movie_list.json";
pub const SIMILARITY_FILE: &str = "similarity.json";

/// Loads the catalog artifacts from `dir`
///
/// Expects `movie_list.json` (array of `{"movie_id", "title", ...}` records,
/// extra fields ignored) and `similarity.json` (array of rows aligned with the
/// movie list). This is blocking file I/O; async callers should go through
/// [`load_catalog`].
pub fn load_from_dir(dir: &Path) -> Result<Catalog, CatalogError> {
    let movies: Vec<Movie> = read_json(dir.join(MOVIE_LIST_FILE))?;
    let similarity: Vec<Vec<f64>> = read_json(dir.join(SIMILARITY_FILE))?;

    let catalog = Catalog::new(movies, similarity)?;

    if catalog.duplicate_titles() > 0 {
        tracing::warn!(
            duplicates = catalog.duplicate_titles(),
            "Catalog contains duplicate titles; lookups resolve to the first match"
        );
    }

    tracing::info!(
        movies = catalog.len(),
        dir = %dir.display(),
        "Catalog loaded"
    );

    Ok(catalog)
}

/// Runs [`load_from_dir`] on the blocking pool
pub async fn load_catalog(dir: PathBuf) -> Result<Catalog, CatalogError> {
    load_blocking(move || load_from_dir(&dir)).await
}

async fn load_blocking<F>(load: F) -> Result<Catalog, CatalogError>
where
    F: FnOnce() -> Result<Catalog, CatalogError> + Send + 'static,
{
    tokio::task::spawn_blocking(load).await?
}

fn read_json<T: DeserializeOwned>(path: PathBuf) -> Result<T, CatalogError> {
    let bytes = std::fs::read(&path).map_err(|source| CatalogError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse { path, source })
}
