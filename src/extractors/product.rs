// src/extractors/product.rs

// --- Imports ---
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::catalog::{CanonicalRecord, DEFAULT_CATEGORY};
use crate::extractors::aliases::{self, resolve, resolve_text};

// --- Constants ---
/// Placeholder name emitted by upstream exporters; treated the same as a missing name.
pub const UNNAMED_SENTINEL: &str = "Unnamed Product";

// Currency symbols and codes, including the "Rs." prefix and "/-" suffix.
static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\b(?:rs|inr|usd|eur|gbp)\b\.?|[₹$€£¥]|/-)")
        .expect("Failed to compile CURRENCY_RE")
});

// Comma-grouped thousands only; "12,50" stays ambiguous.
static GROUPED_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d{1,3}(?:,\d{3})+(?:\.\d+)?$").expect("Failed to compile GROUPED_NUMBER_RE")
});

static FALSE_WORDS: &[&str] = &["false", "no", "n", "0", "out of stock", "unavailable"];

/// Turns raw product-like objects into [`CanonicalRecord`]s.
///
/// Holds the timestamp used for records without `created_at`/`updated_at`,
/// so every record of one run gets the same default.
#[derive(Debug, Clone)]
pub struct ProductNormalizer {
    default_timestamp: String,
}

impl Default for ProductNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductNormalizer {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Normalizer whose default timestamps are fixed to `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            default_timestamp: now.to_rfc3339(),
        }
    }

    /// Normalizes any JSON value; only objects can yield a record.
    pub fn normalize_value(&self, raw: &Value, category_override: &str) -> Option<CanonicalRecord> {
        match raw {
            Value::Object(map) => self.normalize(map, category_override),
            _ => None,
        }
    }

    /// Returns `None` (skip) when the object has no usable name.
    ///
    /// A non-empty `category_override` beats the object's own `category`.
    /// The returned `id` is provisional and always zero.
    pub fn normalize(&self, raw: &Map<String, Value>, category_override: &str) -> Option<CanonicalRecord> {
        let name = resolve_name(raw)?;

        let category_override = category_override.trim();
        let category = if !category_override.is_empty() {
            category_override.to_string()
        } else {
            resolve_text(raw, aliases::CATEGORY).unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
        };

        let text = |keys: &[&str]| resolve_text(raw, keys).unwrap_or_default();
        let timestamp = |keys: &[&str]| {
            resolve_text(raw, keys).unwrap_or_else(|| self.default_timestamp.clone())
        };

        Some(CanonicalRecord {
            id: 0,
            name,
            category,
            subcategory: text(aliases::SUBCATEGORY),
            description: text(aliases::DESCRIPTION),
            price: resolve(raw, aliases::PRICE).and_then(parse_price),
            image_url: text(aliases::IMAGE_URL),
            in_stock: resolve(raw, aliases::IN_STOCK).map(parse_flag).unwrap_or(true),
            created_at: timestamp(aliases::CREATED_AT),
            updated_at: timestamp(aliases::UPDATED_AT),
            brand: text(aliases::BRAND),
            series: text(aliases::SERIES),
            material: text(aliases::MATERIAL),
            features: resolve(raw, aliases::FEATURES).map(join_features).unwrap_or_default(),
            specifications: text(aliases::SPECIFICATIONS),
            dimensions: text(aliases::DIMENSIONS),
            weight: text(aliases::WEIGHT),
            color: text(aliases::COLOR),
            model: text(aliases::MODEL),
            sku: text(aliases::SKU),
        })
    }
}

/// First non-blank of `name`, `product_name`, `title`, unless it is the placeholder.
fn resolve_name(raw: &Map<String, Value>) -> Option<String> {
    resolve_text(raw, aliases::NAME).filter(|name| name != UNNAMED_SENTINEL)
}

/// Numbers pass through; strings lose currency markers and whitespace, then
/// must read as one decimal (optionally comma-grouped). Anything else is absent.
pub fn parse_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_price_text(s)?,
        _ => return None,
    };
    price.is_finite().then_some(price)
}

fn parse_price_text(text: &str) -> Option<f64> {
    let stripped = CURRENCY_RE.replace_all(text, "");
    let compact: String = stripped.split_whitespace().collect();
    if compact.is_empty() {
        return None;
    }
    if let Ok(price) = compact.parse::<f64>() {
        return Some(price);
    }
    if GROUPED_NUMBER_RE.is_match(&compact) {
        return compact.replace(',', "").parse::<f64>().ok();
    }
    None
}

/// Unrecognized values keep the in-stock default.
pub fn parse_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !FALSE_WORDS.contains(&s.trim().to_lowercase().as_str()),
        _ => true,
    }
}

/// Every list element is joined with ", "; scalars pass through as text.
pub fn join_features(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(aliases::value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => aliases::value_to_text(other),
    }
}
