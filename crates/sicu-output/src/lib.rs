//! Patient document persistence.
//!
//! One compact UTF-8 JSON file per patient, `{output_dir}/{patient_id}.json`.
//! Writes replace any previous file atomically; a failed write leaves the
//! previous file (or no file) in place.

pub mod error;
mod read;
mod write;

pub use error::{OutputError, Result};
pub use read::{list_patient_documents, read_patient_document};
pub use write::{document_path, encode_document, write_patient_document};
