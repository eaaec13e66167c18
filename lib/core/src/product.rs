use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Catalog product identifier - any JSON number or a string.
///
/// Numbers are compared and rendered the way a JavaScript template literal
/// renders them, so `1` and `1.0` are the same id and both display as `1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(Number),
    String(String),
}

impl PartialEq for ProductId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ProductId::Number(a), ProductId::Number(b)) => render_number(a) == render_number(b),
            (ProductId::String(a), ProductId::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ProductId {}

impl Hash for ProductId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            ProductId::Number(n) => {
                0u8.hash(state);
                render_number(n).hash(state);
            }
            ProductId::String(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => f.write_str(&render_number(n)),
            ProductId::String(s) => write!(f, "{}", s),
        }
    }
}

/// JavaScript `Number#toString` for a JSON number
fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let f = n.as_f64().unwrap_or(0.0);
    if f == 0.0 {
        return "0".to_string();
    }
    let abs = f.abs();
    if (1e-6..1e21).contains(&abs) {
        // Shortest round-trip form; integral floats print without a fraction
        return f.to_string();
    }
    let exp = format!("{:e}", f);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

impl From<u64> for ProductId {
    fn from(i: u64) -> Self {
        ProductId::Number(Number::from(i))
    }
}

impl From<Number> for ProductId {
    fn from(n: Number) -> Self {
        ProductId::Number(n)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        ProductId::String(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        ProductId::String(s.to_string())
    }
}

impl ProductId {
    /// Parse an id taken from a URL path segment.
    ///
    /// Segments that parse as a JSON number are numeric ids, everything else
    /// is a string id.
    pub fn parse_path(segment: &str) -> Self {
        serde_json::from_str::<Number>(segment)
            .map(ProductId::Number)
            .unwrap_or_else(|_| ProductId::String(segment.to_string()))
    }
}

/// Product category.
///
/// The known variants are the ones the bias rules refer to; anything else is
/// kept verbatim so that comparisons stay exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Electronics,
    Fashion,
    Home,
    Sports,
    Other(String),
}

impl Category {
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            Category::Electronics => "electronics",
            Category::Fashion => "fashion",
            Category::Home => "home",
            Category::Sports => "sports",
            Category::Other(s) => s,
        }
    }

    /// Whether this is one of the built-in categories
    #[inline]
    pub fn is_known(&self) -> bool {
        !matches!(self, Category::Other(_))
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s {
            "electronics" => Category::Electronics,
            "fashion" => Category::Fashion,
            "home" => Category::Home,
            "sports" => Category::Sports,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "electronics" | "fashion" | "home" | "sports" => Category::from(s.as_str()),
            _ => Category::Other(s),
        }
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        match c {
            Category::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable catalog record.
///
/// Optional fields are only serialized when present, so a product is echoed
/// back the way it was read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Any additional fields from the catalog source, echoed back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<ProductId>, category: impl Into<Category>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            name: None,
            price: None,
            image: None,
            extra: Map::new(),
        }
    }

    /// Name, `""` when missing
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Price, `0.0` when missing
    pub fn price(&self) -> f64 {
        self.price.as_ref().and_then(Number::as_f64).unwrap_or(0.0)
    }

    /// Image reference, `""` when missing
    pub fn image(&self) -> &str {
        self.image.as_deref().unwrap_or_default()
    }

    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Non-finite prices are dropped
    #[inline]
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Number::from_f64(price);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
