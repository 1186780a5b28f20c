//! Event-log and nursing-table transformations.
//!
//! Each transformation produces one section of a patient document:
//!
//! - [`index_nursing_records`]: nursing rows grouped by execution timestamp
//! - [`segment_admissions`]: admission periods from `DatSeq` groups
//! - [`extract_alarms`]: whitelisted alarms and their waveform bundles
//!
//! [`build_patient_document`] runs all three for one patient.
//! [`validate_alarms`] and [`retain_alarms_with_nursing`] review the alarms
//! of a built document against its nursing records.

pub mod admission;
pub mod alarms;
pub mod error;
pub mod nursing;
mod record;
mod sequence;
pub mod validation;
pub mod whitelist;

pub use admission::segment_admissions;
pub use alarms::{AlarmExtraction, extract_alarms};
pub use error::{Result, TransformError};
pub use nursing::index_nursing_records;
pub use sequence::{OrderedSequence, ordered_sequences, split_timestamp};
pub use validation::{
    AlarmVerdict, TrueAlarmList, normalize_cell, retain_alarms_with_nursing, validate_alarms,
};
pub use whitelist::{AlarmWhitelist, BUILTIN_ALARM_LIST, clean_label, composite_label, match_key};

use sicu_ingest::{EventLog, NursingTable};
use sicu_model::PatientDocument;

/// Assembles one patient's document from already-loaded inputs.
pub fn build_patient_document(
    log: &EventLog,
    nursing: &NursingTable,
    whitelist: &AlarmWhitelist,
) -> Result<PatientDocument> {
    let admission_periods = segment_admissions(log)?;
    let nursing_records = index_nursing_records(nursing, log.patient_id);
    let AlarmExtraction {
        alarms, waveforms, ..
    } = extract_alarms(log, whitelist)?;

    Ok(PatientDocument {
        admission_periods,
        alarms,
        nursing_records,
        waveforms,
    })
}
