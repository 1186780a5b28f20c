//! Error types for source data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the nursing CSV or an event log.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Errors ===
    /// Failed to parse a CSV record.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Required column not found in the CSV header.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    // === Event Log Errors ===
    /// Event log is not valid JSON.
    #[error("failed to parse JSON {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Event log lacks a required top-level field.
    #[error("field '{field}' missing from {path}")]
    MissingField { field: &'static str, path: PathBuf },

    /// `DatSeq` is present but not shaped as sequence -> timestamp -> records.
    #[error("unexpected event log structure in {path}: {source}")]
    EventLogShape {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl IngestError {
    /// Short stable label for logs and batch summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::DirectoryNotFound { .. } | IngestError::FileNotFound { .. } => {
                "missing-file"
            }
            IngestError::DirectoryRead { .. } | IngestError::FileRead { .. } => "read-failure",
            IngestError::CsvParse { .. } | IngestError::JsonParse { .. } => "parse-error",
            IngestError::MissingColumn { .. } | IngestError::MissingField { .. } => {
                "missing-field"
            }
            IngestError::EventLogShape { .. } => "invalid-structure",
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
