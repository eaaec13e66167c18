//! Synthetic similarity scorer
//!
//! Combines the query key with a product's id and category, hashes the
//! combination and adds category bias from a small rule table:
//!
//! ```text
//! score = round_half_up(min(base + Σ matching bonuses + hash(key-id-category) % 51, 100))
//! ```

use crate::error::{Error, Result};
use crate::hash::string_hash;
use crate::product::{Category, ProductId};
use std::borrow::Cow;
use std::sync::OnceLock;

/// Starting score before bias and hash terms
pub const DEFAULT_BASE: f64 = 50.0;

/// The hash term adds `hash % HASH_SPREAD`, i.e. 0..=50
pub const HASH_SPREAD: u32 = 51;

pub const MIN_SCORE: u32 = 0;
pub const MAX_SCORE: u32 = 100;

/// Bonus applied by each built-in rule
pub const DEFAULT_BONUS: f64 = 20.0;

/// Raises the base score when the query key mentions `keyword` and the
/// product belongs to `category`.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasRule {
    keyword: Cow<'static, str>,
    category: Category,
    bonus: f64,
}

pub const DEFAULT_BIAS_RULES: [BiasRule; 4] = [
    BiasRule::builtin("headphone", Category::Electronics),
    BiasRule::builtin("shoe", Category::Fashion),
    BiasRule::builtin("lamp", Category::Home),
    BiasRule::builtin("sport", Category::Sports),
];

impl BiasRule {
    const fn builtin(keyword: &'static str, category: Category) -> Self {
        Self {
            keyword: Cow::Borrowed(keyword),
            category,
            bonus: DEFAULT_BONUS,
        }
    }

    /// Create a rule. The keyword is lowercased since it is matched against
    /// the lowercased query key.
    pub fn new(keyword: impl Into<String>, category: impl Into<Category>, bonus: f64) -> Self {
        Self {
            keyword: Cow::Owned(keyword.into().to_lowercase()),
            category: category.into(),
            bonus,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn bonus(&self) -> f64 {
        self.bonus
    }

    /// `lowered_key` must already be lowercase
    #[inline]
    pub fn matches(&self, lowered_key: &str, category: &Category) -> bool {
        self.category == *category && lowered_key.contains(self.keyword.as_ref())
    }
}

/// Similarity scorer holding the base score and the bias rule table
#[derive(Debug, Clone, PartialEq)]
pub struct Scorer {
    base: f64,
    rules: Vec<BiasRule>,
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            rules: DEFAULT_BIAS_RULES.to_vec(),
        }
    }
}

impl Scorer {
    /// Create a scorer with a custom base and rule table.
    ///
    /// Base and bonuses must be finite and non-negative so that scores can
    /// never drop below zero.
    pub fn new(base: f64, rules: Vec<BiasRule>) -> Result<Self> {
        if !base.is_finite() || base < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "base score must be finite and non-negative, got {}",
                base
            )));
        }
        if let Some(rule) = rules
            .iter()
            .find(|r| !r.bonus.is_finite() || r.bonus < 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "bias bonus for '{}' must be finite and non-negative, got {}",
                rule.keyword, rule.bonus
            )));
        }
        Ok(Self { base, rules })
    }

    /// Shared instance with the built-in rule set
    pub fn global() -> &'static Scorer {
        static DEFAULT_SCORER: OnceLock<Scorer> = OnceLock::new();
        DEFAULT_SCORER.get_or_init(Scorer::default)
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn rules(&self) -> &[BiasRule] {
        &self.rules
    }

    /// `"{query}-{id}-{category}"`
    pub fn combination_key(query_key: &str, product_id: &ProductId, category: &Category) -> String {
        format!("{}-{}-{}", query_key, product_id, category)
    }

    /// Sum of bonuses of every rule matching the pair. Rules are additive.
    pub fn bias(&self, lowered_key: &str, category: &Category) -> f64 {
        self.rules
            .iter()
            .filter(|rule| rule.matches(lowered_key, category))
            .map(|rule| rule.bonus)
            .sum()
    }

    /// Score a (query key, product) pair
    pub fn score(&self, query_key: &str, product_id: &ProductId, category: &Category) -> u32 {
        self.score_lowered(query_key, &query_key.to_lowercase(), product_id, category)
    }

    /// Like [`Scorer::score`] with the lowercased key computed once by the caller
    pub(crate) fn score_lowered(
        &self,
        query_key: &str,
        lowered_key: &str,
        product_id: &ProductId,
        category: &Category,
    ) -> u32 {
        let hash = string_hash(&Self::combination_key(query_key, product_id, category));
        self.finish(self.bias(lowered_key, category), hash)
    }

    /// Score with the hash term supplied directly instead of computed
    pub fn score_with_hash(&self, query_key: &str, category: &Category, hash: u32) -> u32 {
        self.finish(self.bias(&query_key.to_lowercase(), category), hash)
    }

    fn finish(&self, bias: f64, hash: u32) -> u32 {
        let raw = self.base + bias + f64::from(hash % HASH_SPREAD);
        let capped = raw.min(f64::from(MAX_SCORE));
        // round half up
        let rounded = (capped + 0.5).floor();
        rounded.clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE)) as u32
    }
}

/// Score with the built-in rule set
#[inline]
pub fn score(query_key: &str, product_id: &ProductId, category: &Category) -> u32 {
    Scorer::global().score(query_key, product_id, category)
}
