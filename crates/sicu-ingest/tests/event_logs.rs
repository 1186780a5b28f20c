//! Tests for event-log discovery and loading together.

use std::fs;

use sicu_ingest::{IngestError, list_event_logs, load_event_log, load_event_log_at};
use tempfile::TempDir;

#[test]
fn discovered_logs_load_by_patient_id() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("11572411.json"),
        r#"{"DatSeq": {"2": {"2024-09-09 12:50:00.512": [{"Label": ["SpO2 Sensor Off"]}]},
                      "1": {"2024-09-01 08:00:00.000": [{}]}}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("README.json"), "not json").unwrap();

    let logs = list_event_logs(dir.path()).unwrap();
    assert_eq!(logs.keys().copied().collect::<Vec<_>>(), vec![11572411]);

    let log = load_event_log(dir.path(), 11572411).unwrap();
    assert_eq!(log.path, logs[&11572411]);
    assert_eq!(log.sequences.len(), 2);
    let records = &log.sequences["2"]["2024-09-09 12:50:00.512"];
    assert_eq!(records[0]["Label"][0], "SpO2 Sensor Off");
}

#[test]
fn discovered_paths_load_when_names_are_not_canonical() {
    let dir = TempDir::new().unwrap();
    let content = r#"{"DatSeq": {"1": {"2024-09-01 08:00:00.000": [{}]}}}"#;
    fs::write(dir.path().join("3.JSON"), content).unwrap();
    fs::write(dir.path().join("007.json"), content).unwrap();

    let logs = list_event_logs(dir.path()).unwrap();
    assert_eq!(logs.keys().copied().collect::<Vec<_>>(), vec![3, 7]);

    for (patient_id, path) in &logs {
        let log = load_event_log_at(path, *patient_id).unwrap();
        assert_eq!(log.patient_id, *patient_id);
        assert_eq!(log.sequences.len(), 1);
    }
}

#[test]
fn listed_but_unreadable_log_reports_its_cause() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("3.json"), r#"{"DatSeq": []}"#).unwrap();

    assert!(list_event_logs(dir.path()).unwrap().contains_key(&3));
    let error = load_event_log(dir.path(), 3).unwrap_err();
    assert!(matches!(error, IngestError::MissingField { field: "DatSeq", .. }));
    assert_eq!(error.kind(), "missing-field");
}

#[test]
fn missing_directory() {
    let dir = TempDir::new().unwrap();
    let error = list_event_logs(&dir.path().join("absent")).unwrap_err();
    assert_eq!(error.kind(), "missing-file");
}
