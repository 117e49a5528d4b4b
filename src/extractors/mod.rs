// src/extractors/mod.rs
pub mod aliases;
pub mod pipeline;
pub mod product;
pub mod shape;

// Re-export key extraction types for convenience
pub use pipeline::{collect_inputs, finalize, load_document, CatalogExtractor, ExtractionReport, SourceSummary};
pub use product::ProductNormalizer;
pub use shape::{BucketShape, DocumentShape, ElementShape, ObjectShape, SubcategoryShape};
