//! # vmatch Core
//!
//! Core library for the vmatch visual search demo.
//!
//! Similarity here is synthetic: scores are derived deterministically from the
//! query key (an upload's filename or MIME type, or an image URL) and each
//! product's id and category. No pixels are ever looked at.
//!
//! - [`string_hash`] - stable 32-bit rolling hash
//! - [`Scorer`] - hash term plus category bias rules, clamped to 0..=100
//! - [`rank`] - score a catalog and sort descending (stable)
//! - [`ResultFilter`] - minimum score and category filtering
//! - [`Catalog`] - immutable product collection
//!
//! ## Example
//!
//! ```rust
//! use vmatch_core::{Catalog, Product, QueryKey, ResultFilter, Scorer, UploadInfo};
//!
//! let catalog = Catalog::new(vec![
//!     Product::new(1, "electronics").with_name("Wireless Headphones"),
//!     Product::new(2, "fashion").with_name("Running Shoes"),
//! ])
//! .unwrap();
//!
//! let upload = UploadInfo {
//!     filename: Some("headphone-photo.jpg".to_string()),
//!     ..Default::default()
//! };
//! let key = QueryKey::derive(Some(&upload), None).unwrap();
//!
//! let ranked = catalog.rank(&Scorer::default(), key.as_str());
//! assert_eq!(ranked.len(), 2);
//!
//! let strong = ResultFilter::new(60, "all").apply(&ranked);
//! assert!(strong.iter().all(|r| r.score >= 60));
//! ```

pub mod catalog;
pub mod error;
pub mod filter;
pub mod hash;
pub mod product;
pub mod query;
pub mod rank;
pub mod scorer;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use filter::{filter, CategorySelector, Filter, ResultFilter};
pub use hash::string_hash;
pub use product::{Category, Product, ProductId};
pub use query::{QueryKey, UploadInfo, UPLOAD_FALLBACK_KEY};
pub use rank::{rank, score_range, ScoredResult};
pub use scorer::{score, BiasRule, Scorer, DEFAULT_BIAS_RULES};
