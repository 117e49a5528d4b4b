// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

// Errors raised while loading a single catalog document.
// Both variants are recovered at the per-document boundary.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Could not read document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document {path} is not valid JSON: {source}")]
    UnreadableDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ExtractError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ExtractError::Io { path, .. } => path,
            ExtractError::UnreadableDocument { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
