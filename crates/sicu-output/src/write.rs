//! Document writing.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use sicu_model::PatientDocument;

use crate::error::{OutputError, Result};

/// Location of a patient's document inside `dir`.
pub fn document_path(dir: &Path, patient_id: i64) -> PathBuf {
    dir.join(format!("{patient_id}.json"))
}

/// Compact JSON bytes for a document. Non-ASCII text is written as-is.
pub fn encode_document(document: &PatientDocument) -> Result<Vec<u8>> {
    serde_json::to_vec(document).map_err(|e| OutputError::Serialize { source: e })
}

/// Writes `{dir}/{patient_id}.json`, replacing any existing file.
///
/// The document is written to a sibling temp file, synced, then renamed
/// over the target. `dir` is created if missing. On failure the temp file
/// is removed and any previous document is left in place.
pub fn write_patient_document(
    dir: &Path,
    patient_id: i64,
    document: &PatientDocument,
) -> Result<PathBuf> {
    let bytes = encode_document(document)?;
    let path = document_path(dir, patient_id);
    let temp_path = path.with_extension("json.tmp");

    fs::create_dir_all(dir).map_err(|e| OutputError::Io {
        operation: "create directory",
        path: dir.to_path_buf(),
        source: e,
    })?;

    if let Err(e) = persist(&temp_path, &path, &bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    tracing::debug!(patient_id, path = %path.display(), bytes = bytes.len(), "wrote patient document");
    Ok(path)
}

/// Writes and syncs `temp_path`, then renames it onto `path`.
fn persist(temp_path: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(temp_path).map_err(|e| OutputError::Io {
        operation: "create",
        path: temp_path.to_path_buf(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| OutputError::Io {
        operation: "write",
        path: temp_path.to_path_buf(),
        source: e,
    })?;

    file.sync_all().map_err(|e| OutputError::Io {
        operation: "sync",
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    drop(file);

    fs::rename(temp_path, path).map_err(|e| OutputError::AtomicWriteFailed {
        temp_path: temp_path.to_path_buf(),
        target_path: path.to_path_buf(),
        source: e,
    })
}
