// src/catalog/models.rs
use serde::Serialize;

/// Category label applied when neither the container nor the product names one.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Column order of the tabular output. Matches the field order of [`CanonicalRecord`].
pub const CANONICAL_FIELDS: [&str; 20] = [
    "id",
    "name",
    "category",
    "subcategory",
    "description",
    "price",
    "image_url",
    "in_stock",
    "created_at",
    "updated_at",
    "brand",
    "series",
    "material",
    "features",
    "specifications",
    "dimensions",
    "weight",
    "color",
    "model",
    "sku",
];

/// One flat, uniformly-fielded product row.
///
/// `name` and `category` are never empty. `id` is provisional (zero) until
/// the pipeline's finalize stage assigns the 1-based sorted position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    pub price: Option<f64>, // Absent when unset or unparseable
    pub image_url: String,
    pub in_stock: bool,
    pub created_at: String, // RFC 3339
    pub updated_at: String, // RFC 3339
    pub brand: String,
    pub series: String,
    pub material: String,
    pub features: String, // Comma-joined when the input was a list
    pub specifications: String,
    pub dimensions: String,
    pub weight: String,
    pub color: String,
    pub model: String,
    pub sku: String,
}

/// Labels inherited from the enclosing container, passed by value down the walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryContext {
    /// Overrides the product's own category when non-empty.
    pub category: String,
    /// When set, replaces whatever subcategory the product carried (even with "").
    pub subcategory: Option<String>,
}

impl CategoryContext {
    /// Context for top-level bare products: no override, product labels win.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: None,
        }
    }

    pub fn with_subcategory(&self, subcategory: impl Into<String>) -> Self {
        Self {
            category: self.category.clone(),
            subcategory: Some(subcategory.into()),
        }
    }
}
