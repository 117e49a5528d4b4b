// src/extractors/pipeline.rs

// --- Imports ---
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::catalog::{CanonicalRecord, CategoryContext, DEFAULT_CATEGORY};
use crate::extractors::product::ProductNormalizer;
use crate::extractors::shape::{
    classify_bucket, classify_document, classify_element, classify_subcategory, BucketShape,
    DocumentShape, ElementShape, ObjectShape, SubcategoryShape,
};
use crate::utils::error::ExtractError;

const DOCUMENT_EXTENSION: &str = "json";

// --- Data Structures ---

/// Per-document outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub path: PathBuf,
    pub records: usize,
    pub failed: bool,
}

/// Result of processing a set of documents: the finalized records plus counters.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub records: Vec<CanonicalRecord>,
    pub sources: Vec<SourceSummary>,
}

impl ExtractionReport {
    pub fn documents_processed(&self) -> usize {
        self.sources.len()
    }

    pub fn documents_failed(&self) -> usize {
        self.sources.iter().filter(|s| s.failed).count()
    }
}

// --- Main Extractor Structure ---
pub struct CatalogExtractor {
    normalizer: ProductNormalizer,
}

impl Default for CatalogExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogExtractor {
    pub fn new() -> Self {
        Self::with_normalizer(ProductNormalizer::new())
    }

    pub fn with_normalizer(normalizer: ProductNormalizer) -> Self {
        Self { normalizer }
    }

    /// Walks one parsed document and returns its records in discovery order.
    ///
    /// Ids are provisional; call [`finalize`] once all documents are extracted.
    pub fn extract(&self, document: &Value, source_label: &str) -> Vec<CanonicalRecord> {
        let mut records = Vec::new();

        match classify_document(document) {
            DocumentShape::Array(elements) => {
                tracing::debug!("{}: array document with {} elements", source_label, elements.len());
                let bare = CategoryContext::none();
                for element in elements {
                    self.walk_element(classify_element(element), None, &bare, source_label, &mut records);
                }
            }
            DocumentShape::Object(shape) => {
                self.walk_object(shape, source_label, &mut records);
            }
            DocumentShape::Unrecognized => {
                tracing::warn!("{}: document is neither an array nor an object, nothing to extract", source_label);
            }
        }

        tracing::info!("{}: extracted {} products", source_label, records.len());
        records
    }

    fn walk_object(&self, shape: ObjectShape<'_>, source_label: &str, out: &mut Vec<CanonicalRecord>) {
        match shape {
            ObjectShape::Container(container) => {
                tracing::debug!("{}: object is a category container", source_label);
                self.walk_element(container, None, &CategoryContext::none(), source_label, out);
            }
            ObjectShape::SingleProduct(map) => {
                tracing::debug!("{}: object is a single product", source_label);
                self.emit(map, &CategoryContext::none(), source_label, out);
            }
            ObjectShape::CategoryBuckets(map) => {
                tracing::debug!("{}: object keyed by {} category buckets", source_label, map.len());
                for (key, value) in map {
                    self.walk_bucket(key, value, source_label, out);
                }
            }
        }
    }

    fn walk_bucket(&self, key: &str, value: &Value, source_label: &str, out: &mut Vec<CanonicalRecord>) {
        let ctx = CategoryContext::category(key);
        match classify_bucket(value) {
            BucketShape::Products(items) => {
                for item in items {
                    self.walk_element(classify_element(item), Some(key), &ctx, source_label, out);
                }
            }
            BucketShape::SingleProduct(map) => self.emit(map, &ctx, source_label, out),
            BucketShape::Neither => {
                tracing::debug!("{}: property '{}' is not a product bucket, skipping", source_label, key);
            }
        }
    }

    /// `fallback_label` names containers that carry no label of their own;
    /// `bare` is the context applied to a bare product element.
    fn walk_element(
        &self,
        shape: ElementShape<'_>,
        fallback_label: Option<&str>,
        bare: &CategoryContext,
        source_label: &str,
        out: &mut Vec<CanonicalRecord>,
    ) {
        match shape {
            ElementShape::CategorizedProducts { label, products } => {
                let ctx = CategoryContext::category(resolve_label(label, fallback_label));
                tracing::trace!("{}: category '{}' with {} products", source_label, ctx.category, products.len());
                for product in products {
                    self.emit_value(product, &ctx, source_label, out);
                }
            }
            ElementShape::CategorizedSubcategories { label, subcategories } => {
                let ctx = CategoryContext::category(resolve_label(label, fallback_label));
                for entry in subcategories {
                    match classify_subcategory(entry) {
                        SubcategoryShape::Products { label, products } => {
                            let sub_ctx = ctx.with_subcategory(label.unwrap_or_default());
                            for product in products {
                                self.emit_value(product, &sub_ctx, source_label, out);
                            }
                        }
                        SubcategoryShape::Malformed => {
                            tracing::warn!(
                                "{}: subcategory entry under '{}' has no products array, skipping",
                                source_label,
                                ctx.category
                            );
                        }
                    }
                }
            }
            ElementShape::BareProduct(map) => self.emit(map, bare, source_label, out),
            ElementShape::Malformed { key } => {
                tracing::warn!("{}: element has a '{}' field that is not an array, skipping", source_label, key);
            }
            ElementShape::NotAnObject => {
                tracing::debug!("{}: skipping non-object array element", source_label);
            }
        }
    }

    fn emit_value(&self, raw: &Value, ctx: &CategoryContext, source_label: &str, out: &mut Vec<CanonicalRecord>) {
        match raw {
            Value::Object(map) => self.emit(map, ctx, source_label, out),
            _ => tracing::debug!("{}: skipping non-object product under '{}'", source_label, ctx.category),
        }
    }

    fn emit(&self, raw: &Map<String, Value>, ctx: &CategoryContext, source_label: &str, out: &mut Vec<CanonicalRecord>) {
        match self.normalizer.normalize(raw, &ctx.category) {
            Some(mut record) => {
                // Container subcategory supersedes the product's own.
                if let Some(subcategory) = &ctx.subcategory {
                    record.subcategory = subcategory.clone();
                }
                out.push(record);
            }
            None => {
                tracing::debug!("{}: skipping product without a usable name", source_label);
            }
        }
    }

    /// Loads and extracts every document in order, then finalizes once.
    ///
    /// A document that cannot be read or parsed is logged and contributes
    /// zero records; it never aborts the run.
    pub async fn run(&self, paths: &[PathBuf]) -> ExtractionReport {
        let mut records = Vec::new();
        let mut sources = Vec::with_capacity(paths.len());

        for path in paths {
            let label = path.display().to_string();
            match load_document(path).await {
                Ok(document) => {
                    let extracted = self.extract(&document, &label);
                    sources.push(SourceSummary {
                        path: path.clone(),
                        records: extracted.len(),
                        failed: false,
                    });
                    records.extend(extracted);
                }
                Err(e) => {
                    tracing::error!("Skipping document: {}", e);
                    sources.push(SourceSummary {
                        path: path.clone(),
                        records: 0,
                        failed: true,
                    });
                }
            }
        }

        ExtractionReport {
            records: finalize(records),
            sources,
        }
    }
}

fn resolve_label(label: Option<String>, fallback: Option<&str>) -> String {
    label
        .or_else(|| fallback.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

/// Stable-sorts by category and assigns ids `1..=N` in sorted order.
pub fn finalize(mut records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    records.sort_by(|a, b| a.category.cmp(&b.category));
    for (index, record) in records.iter_mut().enumerate() {
        record.id = index as u64 + 1;
    }
    records
}

/// Reads and parses one document.
pub async fn load_document(path: &Path) -> Result<Value, ExtractError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!("Read {} bytes from {}", content.len(), path.display());

    serde_json::from_str(&content).map_err(|source| ExtractError::UnreadableDocument {
        path: path.to_path_buf(),
        source,
    })
}

/// Expands directories into their `*.json` files (sorted by name); files pass through.
pub fn collect_inputs(paths: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = std::fs::read_dir(path)?
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry.path()),
                    Err(e) => {
                        tracing::warn!("{}: unreadable directory entry, skipping: {}", path.display(), e);
                        None
                    }
                })
                .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION))
                .collect();
            found.sort();
            tracing::debug!("Found {} documents in {}", found.len(), path.display());
            inputs.extend(found);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn extractor() -> CatalogExtractor {
        CatalogExtractor::with_normalizer(ProductNormalizer::at(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        ))
    }

    fn names(records: &[CanonicalRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_categorized_products_drop_unnamed() {
        let doc = json!([{"category": "Pens", "products": [{"name": "Blue Pen"}, {"name": ""}]}]);
        let records = extractor().extract(&doc, "pens.json");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Blue Pen");
        assert_eq!(records[0].category, "Pens");
    }

    #[test]
    fn test_container_category_overrides_product_category() {
        let doc = json!([{"name": "Pens", "products": [{"name": "Red Pen", "category": "Office", "subcategory": "Gel"}]}]);
        let records = extractor().extract(&doc, "pens.json");
        assert_eq!(records[0].category, "Pens");
        assert_eq!(records[0].subcategory, "Gel");
    }

    #[test]
    fn test_unlabelled_container_is_uncategorized() {
        let doc = json!([{"products": [{"name": "Thing", "category": "Ignored"}]}]);
        let records = extractor().extract(&doc, "x.json");
        assert_eq!(records[0].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_subcategory_container_overwrites_product_subcategory() {
        let doc = json!([{
            "category": "Kitchen",
            "subcategories": [
                {"name": "Cookers", "products": [{"name": "Pot", "subcategory": "Stockpots"}]},
                {"products": [{"name": "Pan", "sub_category": "Skillets"}]},
                {"name": "Broken", "products": "none"}
            ]
        }]);
        let records = extractor().extract(&doc, "kitchen.json");
        assert_eq!(names(&records), vec!["Pot", "Pan"]);
        assert_eq!(records[0].category, "Kitchen");
        assert_eq!(records[0].subcategory, "Cookers");
        assert_eq!(records[1].subcategory, "");
    }

    #[test]
    fn test_mixed_array_keeps_discovery_order() {
        let doc = json!([
            {"name": "Loose", "category": "Misc"},
            {"category": "Pens", "products": [{"name": "Blue Pen"}]},
            {"category": "Bad", "products": {"name": "Hidden"}},
            "noise",
            {"title": "No Category"}
        ]);
        let records = extractor().extract(&doc, "mixed.json");
        assert_eq!(names(&records), vec!["Loose", "Blue Pen", "No Category"]);
        assert_eq!(records[0].category, "Misc");
        assert_eq!(records[2].category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_object_document_variants() {
        let e = extractor();

        let container = json!({"name": "Toys", "products": [{"title": "Car"}]});
        let records = e.extract(&container, "toys.json");
        assert_eq!(records[0].category, "Toys");

        let single = json!({"product_name": "Lamp", "category": "Lighting"});
        let records = e.extract(&single, "lamp.json");
        assert_eq!(names(&records), vec!["Lamp"]);
        assert_eq!(records[0].category, "Lighting");

        let buckets = json!({"Toys": [{"title": "Car"}], "Garden": {"name": "Hose"}, "version": 3});
        let records = e.extract(&buckets, "buckets.json");
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.name == "Car" && r.category == "Toys"));
        assert!(records.iter().any(|r| r.name == "Hose" && r.category == "Garden"));
    }

    #[test]
    fn test_bucket_containers_use_own_label_then_key() {
        let doc = json!({
            "Home": [
                {"category": "Kitchen", "products": [{"name": "Pot"}]},
                {"products": [{"name": "Rug"}]},
                {"name": "Lamp"}
            ]
        });
        let records = extractor().extract(&doc, "home.json");
        let labels: Vec<(&str, &str)> = records.iter().map(|r| (r.name.as_str(), r.category.as_str())).collect();
        assert_eq!(labels, vec![("Pot", "Kitchen"), ("Rug", "Home"), ("Lamp", "Home")]);
    }

    #[test]
    fn test_scalar_document_yields_nothing() {
        assert!(extractor().extract(&json!(42), "n.json").is_empty());
        assert!(extractor().extract(&json!([]), "e.json").is_empty());
    }

    #[test]
    fn test_finalize_sorts_stably_and_numbers() {
        let e = extractor();
        let mut records = e.extract(&json!([{"name": "b1", "category": "B"}, {"name": "a1", "category": "A"}]), "one");
        records.extend(e.extract(&json!([{"name": "a2", "category": "A"}]), "two"));

        let finalized = finalize(records);
        assert_eq!(names(&finalized), vec!["a1", "a2", "b1"]);
        let ids: Vec<u64> = finalized.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_finalize_empty() {
        assert!(finalize(Vec::new()).is_empty());
    }

    #[test]
    fn test_run_skips_unreadable_documents() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.json");
        let bad = dir.path().join("b.json");
        let missing = dir.path().join("missing.json");
        std::fs::write(&good, r#"[{"category":"Pens","products":[{"name":"Blue Pen"}]}]"#).unwrap();
        std::fs::write(&bad, "{ not json").unwrap();

        let report = tokio_test::block_on(extractor().run(&[good.clone(), bad.clone(), missing]));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].id, 1);
        assert_eq!(report.documents_processed(), 3);
        assert_eq!(report.documents_failed(), 2);
        assert_eq!(report.sources[0].records, 1);
    }

    #[test]
    fn test_load_document_errors() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[1,").unwrap();

        let err = tokio_test::block_on(load_document(&bad)).unwrap_err();
        assert!(matches!(err, ExtractError::UnreadableDocument { .. }));
        assert_eq!(err.path(), &bad);

        let err = tokio_test::block_on(load_document(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }

    #[test]
    fn test_collect_inputs_expands_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "[]").unwrap();
        std::fs::write(dir.path().join("a.json"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        let extra = PathBuf::from("extra.json");

        let inputs = collect_inputs(&[dir.path().to_path_buf(), extra.clone()]).unwrap();
        assert_eq!(
            inputs,
            vec![dir.path().join("a.json"), dir.path().join("b.json"), extra]
        );
    }
}
