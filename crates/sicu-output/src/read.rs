//! Reading documents back for inspection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sicu_model::PatientDocument;

use crate::error::{OutputError, Result};

/// Parses one patient document file.
pub fn read_patient_document(path: &Path) -> Result<PatientDocument> {
    let bytes = std::fs::read(path).map_err(|e| OutputError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| OutputError::Deserialize {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Lists `{patient_id}.json` documents in `dir`, ascending by patient.
///
/// Files with a non-numeric stem (and leftover `.json.tmp` files) are
/// ignored.
pub fn list_patient_documents(dir: &Path) -> Result<BTreeMap<i64, PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| OutputError::Io {
        operation: "list",
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut documents = BTreeMap::new();
    for entry in entries {
        let path = entry
            .map_err(|e| OutputError::Io {
                operation: "list",
                path: dir.to_path_buf(),
                source: e,
            })?
            .path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        if let Some(patient_id) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<i64>().ok())
        {
            documents.insert(patient_id, path);
        }
    }
    Ok(documents)
}
