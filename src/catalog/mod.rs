pub mod error;
pub mod loader;
pub mod store;

pub use error::CatalogError;
pub use loader::{load_catalog, load_from_dir};
pub use store::Catalog;
