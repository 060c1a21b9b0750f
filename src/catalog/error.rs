use std::path::PathBuf;

/// Errors raised while loading the catalog artifacts
///
/// Any of these is fatal for the recommendation engine: without a consistent
/// catalog there is nothing to rank.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Similarity matrix has {rows} rows but catalog has {items} movies")]
    RowCountMismatch { rows: usize, items: usize },

    #[error("Similarity row {row} has {found} entries, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Similarity score at ({row}, {column}) is not finite")]
    NonFiniteScore { row: usize, column: usize },

    #[error("Catalog load task failed: {0}")]
    LoadTask(#[from] tokio::task::JoinError),
}
