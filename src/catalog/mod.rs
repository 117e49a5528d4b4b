// src/catalog/mod.rs
pub mod models;

pub use models::{CanonicalRecord, CategoryContext, CANONICAL_FIELDS, DEFAULT_CATEGORY};
