//! Output error types.

use std::path::PathBuf;
use thiserror::Error;

/// Writing or reading a patient document failed.
#[derive(Debug, Error)]
pub enum OutputError {
    /// File I/O error.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize patient document")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse patient document {path}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The temp file was written but could not replace the target.
    #[error("failed to move {temp_path} into place at {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OutputError {
    /// Short stable label for logs and batch summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } | Self::AtomicWriteFailed { .. } => "io-failure",
            Self::Serialize { .. } => "serialize-error",
            Self::Deserialize { .. } => "parse-error",
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;
