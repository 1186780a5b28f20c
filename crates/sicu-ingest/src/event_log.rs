//! Monitor event-log loading.
//!
//! Layout of `{patient_id}.json`:
//!
//! ```text
//! {"DatSeq": {"<sequence>": {"<YYYY-MM-DD HH:MM:SS.fff>": [ {detail record}, ... ], ...}, ...}}
//! ```
//!
//! Detail records stay as raw JSON here; field extraction (and its error
//! reporting) happens in the transform stage, which only inspects records
//! that pass the alarm whitelist.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{IngestError, Result};

/// Timestamp -> detail records of one `DatSeq` group.
///
/// Keys are ordered lexicographically, which is chronological for the
/// monitor's zero-padded timestamp format.
pub type SequenceGroup = BTreeMap<String, Vec<Value>>;

/// One patient's event log.
#[derive(Debug, Clone)]
pub struct EventLog {
    pub patient_id: i64,
    pub path: PathBuf,
    /// Raw `DatSeq` keys mapped to their groups. Keys are validated as
    /// integers by the consumers that need the numeric order.
    pub sequences: BTreeMap<String, SequenceGroup>,
}

/// Location of a patient's event log inside `dir`.
pub fn event_log_path(dir: &Path, patient_id: i64) -> PathBuf {
    dir.join(format!("{patient_id}.json"))
}

/// Loads `{dir}/{patient_id}.json`.
///
/// Absence of the file, invalid JSON, a missing `DatSeq` object and a
/// `DatSeq` of the wrong shape each surface as their own error variant.
pub fn load_event_log(dir: &Path, patient_id: i64) -> Result<EventLog> {
    load_event_log_at(&event_log_path(dir, patient_id), patient_id)
}

/// Loads the event log at `path` for `patient_id`.
///
/// Use this with the paths returned by
/// [`list_event_logs`](crate::list_event_logs), whose file names may differ
/// from `{patient_id}.json` (`007.json`, `3.JSON`).
pub fn load_event_log_at(path: &Path, patient_id: i64) -> Result<EventLog> {
    let path = path.to_path_buf();
    let content = std::fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound { path: path.clone() }
        } else {
            IngestError::FileRead {
                path: path.clone(),
                source: e,
            }
        }
    })?;

    let mut root: Value = serde_json::from_str(&content).map_err(|e| IngestError::JsonParse {
        path: path.clone(),
        source: e,
    })?;

    let dat_seq = match root.get_mut("DatSeq") {
        Some(value) if value.is_object() => value.take(),
        _ => {
            return Err(IngestError::MissingField {
                field: "DatSeq",
                path,
            });
        }
    };

    let sequences: BTreeMap<String, SequenceGroup> =
        serde_json::from_value(dat_seq).map_err(|e| IngestError::EventLogShape {
            path: path.clone(),
            source: e,
        })?;

    tracing::debug!(
        patient_id,
        path = %path.display(),
        sequences = sequences.len(),
        "loaded event log"
    );

    Ok(EventLog {
        patient_id,
        path,
        sequences,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_log(dir: &TempDir, patient_id: i64, content: &str) {
        std::fs::write(event_log_path(dir.path(), patient_id), content).unwrap();
    }

    #[test]
    fn test_load_sorts_timestamps() {
        let dir = TempDir::new().unwrap();
        write_log(
            &dir,
            7,
            r#"{"DatSeq": {"1": {"2024-09-02 10:00:00.000": [{}], "2024-09-01 09:00:00.000": [{}]}}}"#,
        );

        let log = load_event_log(dir.path(), 7).unwrap();
        let timestamps: Vec<&String> = log.sequences["1"].keys().collect();
        assert_eq!(
            timestamps,
            vec!["2024-09-01 09:00:00.000", "2024-09-02 10:00:00.000"]
        );
        assert_eq!(log.patient_id, 7);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_event_log(dir.path(), 7);
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        write_log(&dir, 7, r#"{"DatSeq": {"1": "#);
        let result = load_event_log(dir.path(), 7);
        assert!(matches!(result, Err(IngestError::JsonParse { .. })));
    }

    #[test]
    fn test_missing_dat_seq() {
        let dir = TempDir::new().unwrap();
        write_log(&dir, 7, r#"{"Sequences": {}}"#);
        let result = load_event_log(dir.path(), 7);
        assert!(matches!(
            result,
            Err(IngestError::MissingField {
                field: "DatSeq",
                ..
            })
        ));
    }

    #[test]
    fn test_load_at_discovered_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("007.JSON");
        std::fs::write(&path, r#"{"DatSeq": {"1": {"2024-09-01 09:00:00.000": [{}]}}}"#).unwrap();

        let log = load_event_log_at(&path, 7).unwrap();
        assert_eq!(log.patient_id, 7);
        assert_eq!(log.path, path);
        assert!(matches!(
            load_event_log(dir.path(), 7),
            Err(IngestError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_wrong_shape() {
        let dir = TempDir::new().unwrap();
        write_log(&dir, 7, r#"{"DatSeq": {"1": {"2024-09-01 09:00:00": {}}}}"#);
        let result = load_event_log(dir.path(), 7);
        assert!(matches!(result, Err(IngestError::EventLogShape { .. })));
    }
}
