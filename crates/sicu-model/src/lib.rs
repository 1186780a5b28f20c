//! Data model for per-patient alarm review documents.
//!
//! A [`PatientDocument`] joins four views of one patient's monitoring data:
//! admission periods, whitelisted alarms bucketed by admission and date,
//! nursing records grouped by execution timestamp, and the waveform bundle
//! captured at each alarm instant.

pub mod admission;
pub mod alarm;
pub mod document;
pub mod error;
pub mod nursing;
pub mod waveform;

pub use admission::AdmissionPeriod;
pub use alarm::{AlarmEvent, SeverityColor};
pub use document::{
    AlarmIndex, DEFAULT_NURSING_WINDOW_MINUTES, DocumentSummary, NursingRecords, PatientDocument,
    WaveformMap, parse_timestamp,
};
pub use error::{ModelError, Result};
pub use nursing::NursingEntry;
pub use waveform::{NUMERIC_CHANNELS, NumericReading, WaveChannel, WaveformBundle, decode_waveform};
