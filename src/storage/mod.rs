// src/storage/mod.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::catalog::{CanonicalRecord, CANONICAL_FIELDS};
use crate::extractors::ExtractionReport;
use crate::utils::error::StorageError;

/// Writes finalized records and run metadata next to each other.
pub struct StorageManager {
    output_path: PathBuf,
}

impl StorageManager {
    /// Creates a StorageManager for the given CSV path, creating its parent directory
    pub fn new<P: AsRef<Path>>(output_path: P) -> Result<Self, StorageError> {
        let output_path = output_path.as_ref().to_path_buf();

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(StorageError::IoError)?;
            }
        }

        Ok(Self { output_path })
    }

    /// Path of the JSON summary: `<stem>_summary.json` beside the CSV.
    pub fn summary_path(&self) -> PathBuf {
        let stem = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "products".to_string());
        self.output_path.with_file_name(format!("{}_summary.json", stem))
    }

    /// Saves the records as CSV: every field quoted, `""` escapes, `\n` rows, header first.
    pub fn save_records(&self, records: &[CanonicalRecord]) -> Result<PathBuf, StorageError> {
        let mut writer = WriterBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .double_quote(true)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false) // Written explicitly so an empty run still gets one
            .from_path(&self.output_path)?;

        writer.write_record(CANONICAL_FIELDS)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(StorageError::IoError)?;

        tracing::info!("Saved {} records to {}", records.len(), self.output_path.display());

        Ok(self.output_path.clone())
    }

    /// Saves a JSON summary of the run
    pub fn save_summary(&self, report: &ExtractionReport) -> Result<PathBuf, StorageError> {
        let file_path = self.summary_path();

        let mut per_category: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &report.records {
            *per_category.entry(record.category.as_str()).or_default() += 1;
        }

        let sources: Vec<serde_json::Value> = report
            .sources
            .iter()
            .map(|source| {
                serde_json::json!({
                    "path": source.path.display().to_string(),
                    "records": source.records,
                    "failed": source.failed,
                })
            })
            .collect();

        let summary = serde_json::json!({
            "output": self.output_path.display().to_string(),
            "total_records": report.records.len(),
            "documents_processed": report.documents_processed(),
            "documents_failed": report.documents_failed(),
            "categories": per_category,
            "sources": sources,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let summary_str = serde_json::to_string_pretty(&summary)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, summary_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved run summary to {}", file_path.display());

        Ok(file_path)
    }
}
