// src/extractors/shape.rs
//! Structural classification of catalog documents.
//!
//! Arrays are classified per element, so one array may mix categorized
//! containers and bare products. Objects are classified once, and their
//! category buckets are classified per property value.

use serde_json::{Map, Value};

use crate::extractors::aliases;

const PRODUCTS_KEY: &str = "products";
const SUBCATEGORIES_KEY: &str = "subcategories";

/// Top-level shape of a parsed document.
#[derive(Debug)]
pub enum DocumentShape<'a> {
    /// S1/S2/S3: decided per element via [`classify_element`].
    Array(&'a [Value]),
    /// S4: a non-array object.
    Object(ObjectShape<'a>),
    /// Scalar or null document; contributes nothing.
    Unrecognized,
}

/// Shape of one array element (or of an object that is itself a container).
#[derive(Debug)]
pub enum ElementShape<'a> {
    /// S1: the element has a `products` array.
    CategorizedProducts {
        label: Option<String>,
        products: &'a [Value],
    },
    /// S2: no `products` array, but a `subcategories` array.
    CategorizedSubcategories {
        label: Option<String>,
        subcategories: &'a [Value],
    },
    /// S3: an object to be normalized directly as a product.
    BareProduct(&'a Map<String, Value>),
    /// Claims to be a container, but the named key does not hold an array.
    Malformed { key: &'static str },
    /// Scalar, null or nested array element.
    NotAnObject,
}

/// S4 sub-cases, in priority order.
#[derive(Debug)]
pub enum ObjectShape<'a> {
    /// S4(a): the object carries its own `products` (or `subcategories`) container.
    Container(ElementShape<'a>),
    /// S4(b): the object has a name-bearing field.
    SingleProduct(&'a Map<String, Value>),
    /// S4(c): every own property is a potential category bucket.
    CategoryBuckets(&'a Map<String, Value>),
}

/// Shape of one S4(c) property value.
#[derive(Debug)]
pub enum BucketShape<'a> {
    Products(&'a [Value]),
    SingleProduct(&'a Map<String, Value>),
    Neither,
}

/// Shape of one entry of an S2 `subcategories` array.
#[derive(Debug)]
pub enum SubcategoryShape<'a> {
    Products {
        label: Option<String>,
        products: &'a [Value],
    },
    Malformed,
}

pub fn classify_document(document: &Value) -> DocumentShape<'_> {
    match document {
        Value::Array(elements) => DocumentShape::Array(elements),
        Value::Object(map) => DocumentShape::Object(classify_object(map)),
        _ => DocumentShape::Unrecognized,
    }
}

pub fn classify_element(element: &Value) -> ElementShape<'_> {
    match element {
        Value::Object(map) => classify_element_map(map),
        _ => ElementShape::NotAnObject,
    }
}

fn classify_element_map(map: &Map<String, Value>) -> ElementShape<'_> {
    if let Some(Value::Array(products)) = map.get(PRODUCTS_KEY) {
        return ElementShape::CategorizedProducts {
            label: container_label(map),
            products,
        };
    }
    if let Some(Value::Array(subcategories)) = map.get(SUBCATEGORIES_KEY) {
        return ElementShape::CategorizedSubcategories {
            label: container_label(map),
            subcategories,
        };
    }
    if map.contains_key(PRODUCTS_KEY) {
        return ElementShape::Malformed { key: PRODUCTS_KEY };
    }
    if map.contains_key(SUBCATEGORIES_KEY) {
        return ElementShape::Malformed { key: SUBCATEGORIES_KEY };
    }
    ElementShape::BareProduct(map)
}

pub fn classify_object(map: &Map<String, Value>) -> ObjectShape<'_> {
    match classify_element_map(map) {
        ElementShape::BareProduct(_) => {}
        container => return ObjectShape::Container(container),
    }
    if is_product_like(map) {
        ObjectShape::SingleProduct(map)
    } else {
        ObjectShape::CategoryBuckets(map)
    }
}

pub fn classify_bucket(value: &Value) -> BucketShape<'_> {
    match value {
        Value::Array(products) => BucketShape::Products(products),
        Value::Object(map) => BucketShape::SingleProduct(map),
        _ => BucketShape::Neither,
    }
}

pub fn classify_subcategory(entry: &Value) -> SubcategoryShape<'_> {
    match entry {
        Value::Object(map) => match map.get(PRODUCTS_KEY) {
            Some(Value::Array(products)) => SubcategoryShape::Products {
                label: aliases::resolve_text(map, aliases::CONTAINER_SUBCATEGORY),
                products,
            },
            _ => SubcategoryShape::Malformed,
        },
        _ => SubcategoryShape::Malformed,
    }
}

/// A container's own category label: `category`, then `name`.
pub fn container_label(map: &Map<String, Value>) -> Option<String> {
    aliases::resolve_text(map, aliases::CONTAINER_CATEGORY)
}

/// True when the object carries any name-bearing field.
pub fn is_product_like(map: &Map<String, Value>) -> bool {
    aliases::has_any(map, aliases::NAME)
}
