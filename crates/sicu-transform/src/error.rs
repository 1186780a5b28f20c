//! Error types for event-log transformation.

use thiserror::Error;

/// A patient's event log could not be turned into document parts.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A `DatSeq` key is not an integer.
    #[error("DatSeq key '{key}' is not an integer")]
    InvalidSequenceKey { key: String },

    /// A `DatSeq` group has no timestamped entries.
    #[error("DatSeq group '{sequence}' has no entries")]
    EmptySequence { sequence: String },

    /// A detail record lacks a field the extraction needs.
    #[error("entry {timestamp}: missing field '{field}'")]
    MissingField { timestamp: String, field: String },

    /// A detail record field has the wrong JSON type.
    #[error("entry {timestamp}: field '{field}' is not {expected}")]
    InvalidField {
        timestamp: String,
        field: String,
        expected: &'static str,
    },

    /// `Severity[0]` is outside the monitor's 0..=6 code table.
    #[error("entry {timestamp}: unknown severity code {code}")]
    UnknownSeverity { timestamp: String, code: i64 },

    /// A timestamp key lacks the `date time` separator.
    #[error("malformed timestamp '{timestamp}'")]
    MalformedTimestamp { timestamp: String },

    /// The nursing window around an alarm could not be computed.
    #[error("alarm {alarm_id}: {source}")]
    NursingWindow {
        alarm_id: String,
        #[source]
        source: sicu_model::ModelError,
    },
}

impl TransformError {
    /// Short stable label for logs and batch summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            TransformError::InvalidSequenceKey { .. }
            | TransformError::EmptySequence { .. }
            | TransformError::InvalidField { .. } => "invalid-structure",
            TransformError::MissingField { .. } => "missing-field",
            TransformError::UnknownSeverity { .. } => "bad-severity",
            TransformError::MalformedTimestamp { .. } => "malformed-timestamp",
            TransformError::NursingWindow { .. } => "invalid-window",
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
