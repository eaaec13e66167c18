// Result filtering over an already ranked sequence
use crate::product::Category;
use crate::rank::ScoredResult;

pub trait Filter {
    fn matches(&self, result: &ScoredResult) -> bool;
}

/// Category constraint of a [`ResultFilter`]. `"all"` disables it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelector {
    #[default]
    All,
    Only(Category),
}

impl CategorySelector {
    pub const ALL: &'static str = "all";

    #[inline]
    pub fn accepts(&self, category: &Category) -> bool {
        match self {
            CategorySelector::All => true,
            CategorySelector::Only(wanted) => wanted == category,
        }
    }
}

impl From<&str> for CategorySelector {
    fn from(s: &str) -> Self {
        if s == Self::ALL {
            CategorySelector::All
        } else {
            CategorySelector::Only(Category::from(s))
        }
    }
}

impl From<Category> for CategorySelector {
    fn from(c: Category) -> Self {
        CategorySelector::Only(c)
    }
}

/// Keeps results with `score >= min_score` whose category is selected.
///
/// Never re-sorts and never recomputes scores, so the same ranked sequence
/// can be filtered repeatedly with different thresholds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultFilter {
    min_score: u32,
    category: CategorySelector,
}

impl ResultFilter {
    pub fn new(min_score: u32, category: impl Into<CategorySelector>) -> Self {
        Self {
            min_score,
            category: category.into(),
        }
    }

    pub fn min_score(&self) -> u32 {
        self.min_score
    }

    pub fn category(&self) -> &CategorySelector {
        &self.category
    }

    /// True when every result passes
    pub fn is_pass_through(&self) -> bool {
        self.min_score == 0 && self.category == CategorySelector::All
    }

    pub fn apply(&self, results: &[ScoredResult]) -> Vec<ScoredResult> {
        results
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

impl Filter for ResultFilter {
    fn matches(&self, result: &ScoredResult) -> bool {
        result.score >= self.min_score && self.category.accepts(&result.product.category)
    }
}

/// Filter a ranked sequence by minimum score and category
pub fn filter(
    results: &[ScoredResult],
    min_score: u32,
    category: impl Into<CategorySelector>,
) -> Vec<ScoredResult> {
    ResultFilter::new(min_score, category).apply(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Product;
    use crate::rank::rank;

    fn create_ranked() -> Vec<ScoredResult> {
        let categories = ["electronics", "fashion", "home", "sports", "toys"];
        let products: Vec<Product> = (0..40u64)
            .map(|i| Product::new(i, categories[i as usize % categories.len()]))
            .collect();
        rank("lamp-photo.jpg", &products)
    }

    #[test]
    fn test_filter_empty() {
        assert!(filter(&[], 0, "all").is_empty());
        assert!(filter(&[], 90, "home").is_empty());
    }

    #[test]
    fn test_pass_through() {
        let ranked = create_ranked();
        let f = ResultFilter::default();
        assert!(f.is_pass_through());
        assert_eq!(f.apply(&ranked), ranked);
    }

    #[test]
    fn test_retained_and_excluded_partition() {
        let ranked = create_ranked();
        for min in [0, 55, 60, 75, 90, 100] {
            for cat in ["all", "electronics", "home", "toys", "garden"] {
                let f = ResultFilter::new(min, cat);
                let kept = f.apply(&ranked);
                for r in &kept {
                    assert!(r.score >= min);
                    assert!(cat == "all" || r.product.category.as_str() == cat);
                }
                let excluded: Vec<&ScoredResult> =
                    ranked.iter().filter(|r| !kept.contains(r)).collect();
                for r in excluded {
                    assert!(r.score < min || (cat != "all" && r.product.category.as_str() != cat));
                }
            }
        }
    }

    #[test]
    fn test_preserves_order() {
        let ranked = create_ranked();
        let kept = filter(&ranked, 60, "all");
        assert!(kept.windows(2).all(|w| w[0].score >= w[1].score));
        let positions: Vec<usize> = kept
            .iter()
            .map(|k| ranked.iter().position(|r| r == k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_idempotent() {
        let ranked = create_ranked();
        let f = ResultFilter::new(65, "home");
        let once = f.apply(&ranked);
        let twice = f.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_category_exact_match() {
        let ranked = create_ranked();
        let toys = filter(&ranked, 0, "toys");
        assert_eq!(toys.len(), 8);
        assert!(filter(&ranked, 0, "Toys").is_empty());
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!(CategorySelector::from("all"), CategorySelector::All);
        assert_eq!(
            CategorySelector::from("home"),
            CategorySelector::Only(Category::Home)
        );
        assert_eq!(
            CategorySelector::from("All"),
            CategorySelector::Only(Category::Other("All".to_string()))
        );
    }
}
