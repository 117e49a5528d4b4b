// src/extractors/aliases.rs
//! Accepted input keys for each canonical field, in priority order.
//!
//! The first key whose value is present, non-null and not a blank string wins.
//! Each const is one row of the alias policy; `id` has none because input
//! ids are ignored and reassigned after sorting.

use serde_json::{Map, Value};

pub const NAME: &[&str] = &["name", "product_name", "title"];
pub const CATEGORY: &[&str] = &["category"];
pub const SUBCATEGORY: &[&str] = &["subcategory", "sub_category"];
pub const DESCRIPTION: &[&str] = &["description", "desc"];
pub const PRICE: &[&str] = &["price"];
pub const IMAGE_URL: &[&str] = &["image_url", "image", "img"];
pub const IN_STOCK: &[&str] = &["in_stock"];
pub const CREATED_AT: &[&str] = &["created_at"];
pub const UPDATED_AT: &[&str] = &["updated_at"];
pub const BRAND: &[&str] = &["brand"];
pub const SERIES: &[&str] = &["series"];
pub const MATERIAL: &[&str] = &["material"];
pub const FEATURES: &[&str] = &["features"];
pub const SPECIFICATIONS: &[&str] = &["specifications"];
pub const DIMENSIONS: &[&str] = &["dimensions"];
pub const WEIGHT: &[&str] = &["weight"];
pub const COLOR: &[&str] = &["color"];
pub const MODEL: &[&str] = &["model"];
pub const SKU: &[&str] = &["sku", "code"];

/// Container labels: the category of an S1/S2 element or a container object.
pub const CONTAINER_CATEGORY: &[&str] = &["category", "name"];
/// Container labels: the subcategory of an S2 subcategory entry.
pub const CONTAINER_SUBCATEGORY: &[&str] = &["name", "subcategory"];

/// Finds the first usable value among `keys`.
pub fn resolve<'a>(raw: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| is_usable(value))
}

/// Finds the first usable value among `keys` and renders it as trimmed text.
pub fn resolve_text(raw: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .map(value_to_text)
        .find(|text| !text.is_empty())
}

/// True when any of `keys` is present with a usable value.
pub fn has_any(raw: &Map<String, Value>, keys: &[&str]) -> bool {
    resolve(raw, keys).is_some()
}

fn is_usable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Scalars become their plain text; nested values become compact JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CANONICAL_FIELDS;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    // Same order as CANONICAL_FIELDS, minus `id`.
    const FIELD_ALIASES: [&[&str]; 19] = [
        NAME, CATEGORY, SUBCATEGORY, DESCRIPTION, PRICE, IMAGE_URL, IN_STOCK, CREATED_AT,
        UPDATED_AT, BRAND, SERIES, MATERIAL, FEATURES, SPECIFICATIONS, DIMENSIONS, WEIGHT,
        COLOR, MODEL, SKU,
    ];

    #[test]
    fn test_each_field_accepts_its_canonical_key_first() {
        let fields: Vec<&str> = CANONICAL_FIELDS.iter().copied().filter(|f| *f != "id").collect();
        assert_eq!(fields.len(), FIELD_ALIASES.len());
        for (field, keys) in fields.iter().zip(FIELD_ALIASES.iter()) {
            assert_eq!(keys[0], *field);
        }
    }

    #[test]
    fn test_alias_keys_are_not_shared_between_fields() {
        let mut seen = std::collections::HashSet::new();
        for keys in FIELD_ALIASES.iter() {
            for key in keys.iter() {
                assert!(seen.insert(*key), "key '{}' used by two fields", key);
            }
        }
    }

    #[test]
    fn test_resolve_skips_blank_and_null() {
        let raw = obj(json!({"name": "  ", "product_name": null, "title": "Car"}));
        assert_eq!(resolve_text(&raw, NAME).as_deref(), Some("Car"));
    }

    #[test]
    fn test_resolve_respects_priority() {
        let raw = obj(json!({"title": "Third", "product_name": "Second", "name": "First"}));
        assert_eq!(resolve_text(&raw, NAME).as_deref(), Some("First"));

        let raw = obj(json!({"code": "C-1", "sku": "S-1"}));
        assert_eq!(resolve_text(&raw, SKU).as_deref(), Some("S-1"));
    }

    #[test]
    fn test_value_to_text_renders_scalars_and_nested() {
        assert_eq!(value_to_text(&json!(12)), "12");
        assert_eq!(value_to_text(&json!(false)), "false");
        assert_eq!(value_to_text(&json!({"w": 3})), r#"{"w":3}"#);
        assert_eq!(value_to_text(&Value::Null), "");
    }
}
