//! Event-log discovery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Lists `{patient_id}.json` files in a directory.
///
/// Returns patient identifiers mapped to their file, ascending. Files whose
/// stem is not an integer are skipped.
pub fn list_event_logs(dir: &Path) -> Result<BTreeMap<i64, PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut logs = BTreeMap::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        // Check for .json extension (case-insensitive)
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            continue;
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        match stem.trim().parse::<i64>() {
            Ok(patient_id) => {
                logs.insert(patient_id, path);
            }
            Err(_) => {
                tracing::debug!(path = %path.display(), "skipping event log with non-numeric name");
            }
        }
    }

    Ok(logs)
}
