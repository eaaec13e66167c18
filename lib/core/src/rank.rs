use crate::product::Product;
use crate::scorer::Scorer;
use rayon::prelude::*;
use serde::Serialize;

/// Catalogs at least this large are scored on the rayon pool
pub const PARALLEL_THRESHOLD: usize = 4096;

/// A product paired with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "similarity")]
    pub score: u32,
}

/// Score every product against the query key with the built-in rules and
/// sort descending.
pub fn rank(query_key: &str, products: &[Product]) -> Vec<ScoredResult> {
    Scorer::global().rank(query_key, products)
}

impl Scorer {
    /// Score every product and sort by score descending.
    ///
    /// One result per input product. The sort is stable, so equal scores
    /// keep catalog order.
    pub fn rank(&self, query_key: &str, products: &[Product]) -> Vec<ScoredResult> {
        let lowered = query_key.to_lowercase();
        let score_one = |product: &Product| ScoredResult {
            score: self.score_lowered(query_key, &lowered, &product.id, &product.category),
            product: product.clone(),
        };

        // collect() on an indexed parallel iterator preserves input order
        let mut results: Vec<ScoredResult> = if products.len() >= PARALLEL_THRESHOLD {
            products.par_iter().map(score_one).collect()
        } else {
            products.iter().map(score_one).collect()
        };

        results.sort_by(|a, b| b.score.cmp(&a.score));
        results
    }
}

/// Lowest and highest score of a ranked sequence, as `(min, max)`
pub fn score_range(ranked: &[ScoredResult]) -> Option<(u32, u32)> {
    match (ranked.last(), ranked.first()) {
        (Some(low), Some(high)) => Some((low.score, high.score)),
        _ => None,
    }
}
