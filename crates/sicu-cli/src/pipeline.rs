//! Batch orchestration: one patient document per patient present in both
//! the nursing export and the event-log directory.
//!
//! Shared inputs (nursing table, event-log listing, alarm list) are loaded
//! once; a failure there aborts the run. Per-patient failures are recorded
//! and the batch moves on to the next patient.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::TimeDelta;
use tracing::{debug, info, info_span, trace, warn};

use sicu_ingest::{
    NursingColumns, NursingTable, list_event_logs, load_event_log_at, read_nursing_table,
};
use sicu_model::{DocumentSummary, PatientDocument};
use sicu_output::write_patient_document;
use sicu_transform::{AlarmWhitelist, build_patient_document, retain_alarms_with_nursing};

use crate::logging::redact_value;

/// Inputs and switches for one batch run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub nursing_csv: PathBuf,
    pub event_log_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Replaces the built-in technical alarm list.
    pub alarm_list: Option<PathBuf>,
    pub delimiter: u8,
    pub columns: NursingColumns,
    /// Drop alarms without a nursing entry within this window of them.
    pub require_nursing_within: Option<TimeDelta>,
    /// Build every document but write none.
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            nursing_csv: PathBuf::from("data/nursing_records.csv"),
            event_log_dir: PathBuf::from("data/event_logs"),
            output_dir: PathBuf::from("DATA"),
            alarm_list: None,
            delimiter: b',',
            columns: NursingColumns::default(),
            require_nursing_within: None,
            dry_run: false,
        }
    }
}

/// A patient whose document was built (and written, unless dry run).
#[derive(Debug, Clone)]
pub struct PatientOutcome {
    pub patient_id: i64,
    pub path: Option<PathBuf>,
    pub summary: DocumentSummary,
}

/// A patient whose document could not be built or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientFailure {
    pub patient_id: i64,
    /// Stable error label, e.g. `missing-field`.
    pub kind: &'static str,
    pub message: String,
}

impl PatientFailure {
    pub(crate) fn new(patient_id: i64, kind: &'static str, error: &dyn std::error::Error) -> Self {
        Self {
            patient_id,
            kind,
            message: error.to_string(),
        }
    }
}

/// Why a patient was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// In the nursing export only.
    NoEventLog,
    /// Event log only.
    NoNursingRecords,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoEventLog => "no event log",
            SkipReason::NoNursingRecords => "no nursing records",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub written: Vec<PatientOutcome>,
    pub failures: Vec<PatientFailure>,
    pub skipped: Vec<(i64, SkipReason)>,
}

impl BatchResult {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Runs the whole batch.
///
/// # Errors
///
/// Fails only when a shared input cannot be loaded: the nursing CSV, the
/// event-log directory listing or the alarm list.
pub fn run_batch(config: &PipelineConfig) -> Result<BatchResult> {
    let batch_span = info_span!("batch", output_dir = %config.output_dir.display());
    let _batch_guard = batch_span.enter();

    let whitelist = load_whitelist(config.alarm_list.as_deref())?;
    let nursing = read_nursing_table(&config.nursing_csv, &config.columns, config.delimiter)
        .with_context(|| format!("load nursing records {}", config.nursing_csv.display()))?;
    let logs = list_event_logs(&config.event_log_dir)
        .with_context(|| format!("list event logs in {}", config.event_log_dir.display()))?;

    let nursing_ids = nursing.patient_ids();
    let log_ids: BTreeSet<i64> = logs.keys().copied().collect();

    let mut result = BatchResult {
        output_dir: config.output_dir.clone(),
        dry_run: config.dry_run,
        written: Vec::new(),
        failures: Vec::new(),
        skipped: Vec::new(),
    };
    result.skipped.extend(
        nursing_ids
            .difference(&log_ids)
            .map(|id| (*id, SkipReason::NoEventLog)),
    );
    result.skipped.extend(
        log_ids
            .difference(&nursing_ids)
            .map(|id| (*id, SkipReason::NoNursingRecords)),
    );
    result.skipped.sort_by_key(|(id, _)| *id);
    debug!(
        nursing_patients = nursing_ids.len(),
        event_logs = log_ids.len(),
        skipped = result.skipped.len(),
        "selected patients"
    );

    // Discovered names may differ from `{id}.json` (`007.json`, `3.JSON`).
    let selected = logs.iter().filter(|(id, _)| nursing_ids.contains(*id));
    for (&patient_id, log_path) in selected {
        let span = info_span!("patient", patient_id);
        let _guard = span.enter();

        match process_patient(config, patient_id, log_path, &nursing, whitelist.as_ref()) {
            Ok(outcome) => {
                info!(
                    alarms = outcome.summary.alarms,
                    nursing_records = outcome.summary.nursing_records,
                    "patient document built"
                );
                result.written.push(outcome);
            }
            Err(failure) => {
                warn!(kind = failure.kind, error = %failure.message, "patient skipped");
                result.failures.push(failure);
            }
        }
    }

    info!(
        written = result.written.len(),
        failed = result.failures.len(),
        skipped = result.skipped.len(),
        "batch complete"
    );
    Ok(result)
}

/// Either a list file or the built-in list.
enum Whitelist {
    Builtin,
    Loaded(AlarmWhitelist),
}

impl AsRef<AlarmWhitelist> for Whitelist {
    fn as_ref(&self) -> &AlarmWhitelist {
        match self {
            Whitelist::Builtin => AlarmWhitelist::builtin(),
            Whitelist::Loaded(whitelist) => whitelist,
        }
    }
}

fn load_whitelist(path: Option<&Path>) -> Result<Whitelist> {
    match path {
        Some(path) => AlarmWhitelist::load(path)
            .map(Whitelist::Loaded)
            .with_context(|| format!("load alarm list {}", path.display())),
        None => Ok(Whitelist::Builtin),
    }
}

fn process_patient(
    config: &PipelineConfig,
    patient_id: i64,
    log_path: &Path,
    nursing: &NursingTable,
    whitelist: &AlarmWhitelist,
) -> std::result::Result<PatientOutcome, PatientFailure> {
    let log = load_event_log_at(log_path, patient_id)
        .map_err(|e| PatientFailure::new(patient_id, e.kind(), &e))?;
    let mut document = build_patient_document(&log, nursing, whitelist)
        .map_err(|e| PatientFailure::new(patient_id, e.kind(), &e))?;
    if let Some(window) = config.require_nursing_within {
        retain_alarms_with_nursing(&mut document, window)
            .map_err(|e| PatientFailure::new(patient_id, e.kind(), &e))?;
    }
    trace_document(&document);

    let summary = document.summary();
    if config.dry_run {
        return Ok(PatientOutcome {
            patient_id,
            path: None,
            summary,
        });
    }

    let path = write_patient_document(&config.output_dir, patient_id, &document)
        .map_err(|e| PatientFailure::new(patient_id, e.kind(), &e))?;
    Ok(PatientOutcome {
        patient_id,
        path: Some(path),
        summary,
    })
}

fn trace_document(document: &PatientDocument) {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    for (key, bundle) in &document.waveforms {
        trace!(timestamp = %key, label = redact_value(&bundle.alarm_label), "alarm");
    }
    for (key, entries) in &document.nursing_records {
        for entry in entries {
            trace!(
                timestamp = %key,
                activity = redact_value(entry.activity.as_deref().unwrap_or_default()),
                "nursing entry"
            );
        }
    }
}
