//! Batch alarm validation over written patient documents.
//!
//! Every alarm of every document in a directory is judged against the
//! true-alarm list. Unreadable documents are recorded as failures and the
//! run moves on.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use tracing::{info, info_span, warn};

use sicu_ingest::{NursingColumns, read_true_alarm_list};
use sicu_model::DEFAULT_NURSING_WINDOW_MINUTES;
use sicu_output::{list_patient_documents, read_patient_document};
use sicu_transform::{AlarmVerdict, TrueAlarmList, validate_alarms};

use crate::pipeline::PatientFailure;

#[derive(Debug, Clone)]
pub struct ValidateConfig {
    pub documents_dir: PathBuf,
    /// Tab-separated list of nursing actions that confirm an alarm.
    pub true_alarms: PathBuf,
    pub columns: NursingColumns,
    pub delimiter: u8,
    pub window: TimeDelta,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            documents_dir: PathBuf::from("DATA"),
            true_alarms: PathBuf::from("data/nr_alarm_true_list.tsv"),
            columns: NursingColumns::default(),
            delimiter: b'\t',
            window: TimeDelta::minutes(DEFAULT_NURSING_WINDOW_MINUTES),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatientValidation {
    pub patient_id: i64,
    pub verdicts: Vec<AlarmVerdict>,
}

impl PatientValidation {
    pub fn true_alarms(&self) -> usize {
        self.verdicts.iter().filter(|verdict| verdict.is_true()).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub patients: Vec<PatientValidation>,
    pub failures: Vec<PatientFailure>,
}

impl ValidationReport {
    pub fn alarms(&self) -> usize {
        self.patients.iter().map(|patient| patient.verdicts.len()).sum()
    }

    pub fn true_alarms(&self) -> usize {
        self.patients.iter().map(PatientValidation::true_alarms).sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Judges every document in the directory, in ascending patient order.
///
/// # Errors
///
/// Fails only when the true-alarm list or the directory listing cannot be
/// read.
pub fn run_validation(config: &ValidateConfig) -> Result<ValidationReport> {
    let records = read_true_alarm_list(&config.true_alarms, &config.columns, config.delimiter)
        .with_context(|| format!("load true-alarm list {}", config.true_alarms.display()))?;
    let list = TrueAlarmList::new(&records);
    let documents = list_patient_documents(&config.documents_dir)
        .with_context(|| format!("list documents in {}", config.documents_dir.display()))?;

    let mut report = ValidationReport::default();
    for (patient_id, path) in documents {
        let span = info_span!("patient", patient_id);
        let _guard = span.enter();

        let verdicts = read_patient_document(&path)
            .map_err(|e| PatientFailure::new(patient_id, e.kind(), &e))
            .and_then(|document| {
                validate_alarms(&document, &list, config.window)
                    .map_err(|e| PatientFailure::new(patient_id, e.kind(), &e))
            });
        match verdicts {
            Ok(verdicts) => report.patients.push(PatientValidation {
                patient_id,
                verdicts,
            }),
            Err(failure) => {
                warn!(kind = failure.kind, error = %failure.message, "patient not validated");
                report.failures.push(failure);
            }
        }
    }

    info!(
        patients = report.patients.len(),
        alarms = report.alarms(),
        true_alarms = report.true_alarms(),
        failed = report.failures.len(),
        "validation complete"
    );
    Ok(report)
}
