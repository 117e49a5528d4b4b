// src/lib.rs
//! Normalizes heterogeneous catalog JSON documents into one flat record set.
//!
//! ```no_run
//! # async fn demo() {
//! use std::path::PathBuf;
//! use catalog_normalizer::extractors::CatalogExtractor;
//!
//! let paths = vec![PathBuf::from("catalog/pens.json"), PathBuf::from("catalog/kitchen.json")];
//! let report = CatalogExtractor::new().run(&paths).await;
//! for record in &report.records {
//!     println!("{} {} {}", record.id, record.category, record.name);
//! }
//! # }
//! ```
pub mod catalog;
pub mod extractors;
pub mod storage;
pub mod utils;

pub use catalog::{CanonicalRecord, CategoryContext};
pub use extractors::{finalize, CatalogExtractor, ExtractionReport, ProductNormalizer};
pub use utils::AppError;
