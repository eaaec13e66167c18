pub mod loader;
pub mod manager;

pub use loader::CatalogLoader;
pub use manager::CatalogStore;
