//! # vmatch
//!
//! A demo "visual search" service: submit an image (upload or URL) and get
//! back the catalog ranked by a synthetic similarity score.
//!
//! There is no image analysis. The score is a pure function of the query key
//! (the upload's filename or MIME type, or the URL) and each product's id and
//! category, so the same input always produces the same ranking.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! vmatch --catalog ./data/product.json --port 3001
//! curl -F image=@headphone-photo.jpg http://localhost:3001/api/search
//! curl -F imageUrl=https://example.com/lamp.png "http://localhost:3001/api/search?minSimilarity=60"
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use vmatch::prelude::*;
//!
//! let catalog = Catalog::new(vec![
//!     Product::new(1, "electronics"),
//!     Product::new(2, "fashion"),
//! ])
//! .unwrap();
//!
//! let ranked = rank("headphone-photo.jpg", catalog.products());
//! let filtered = filter(&ranked, 60, "all");
//! assert!(filtered.iter().all(|r| r.score >= 60));
//! ```
//!
//! ## Crate Structure
//!
//! - `vmatch-core` - hashing, scoring, ranking, filtering, catalog
//! - `vmatch-storage` - catalog file loading and reload
//! - `vmatch-api` - REST API

// Re-export core types
pub use vmatch_core::{
    filter, rank, score, string_hash, BiasRule, Catalog, Category, CategorySelector, Error,
    Filter, Product, ProductId, QueryKey, Result, ResultFilter, ScoredResult, Scorer, UploadInfo,
};

// Re-export storage
pub use vmatch_storage::{CatalogLoader, CatalogStore};

// Re-export API
pub use vmatch_api::{ApiConfig, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        filter, rank, score, Catalog, CatalogStore, Category, CategorySelector, Error, Filter,
        Product, ProductId, QueryKey, Result, ResultFilter, ScoredResult, Scorer, UploadInfo,
    };
}
