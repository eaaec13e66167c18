use crate::error::{Error, Result};
use crate::filter::CategorySelector;
use crate::product::{Product, ProductId};
use crate::rank::ScoredResult;
use crate::scorer::Scorer;
use ahash::AHashMap;

/// Read-only, ordered collection of products.
///
/// Built once and never mutated; a reload builds a fresh `Catalog` and
/// swaps the handle.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: AHashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate product ids
    pub fn new(products: Vec<Product>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), pos).is_some() {
                return Err(Error::DuplicateProduct(product.id.to_string()));
            }
        }
        Ok(Self { products, index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of products
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let products: Vec<Product> = serde_json::from_slice(bytes)?;
        Self::new(products)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[inline]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&pos| &self.products[pos])
    }

    /// Products in catalog order restricted to a category
    pub fn by_category<'a>(
        &'a self,
        selector: &'a CategorySelector,
    ) -> impl Iterator<Item = &'a Product> + 'a {
        self.products
            .iter()
            .filter(move |p| selector.accepts(&p.category))
    }

    /// Rank the whole catalog against a query key
    pub fn rank(&self, scorer: &Scorer, query_key: &str) -> Vec<ScoredResult> {
        scorer.rank(query_key, &self.products)
    }
}
