//! HTTP surface for vmatch.
//!
//! Routes requests into `vmatch-core`: derives the query key from an upload
//! or URL, ranks the current catalog and renders JSON envelopes.

pub mod config;
pub mod form;
pub mod rest;

pub use config::ApiConfig;
pub use rest::{AppState, RestApi};
