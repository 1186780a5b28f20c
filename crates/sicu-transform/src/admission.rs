//! Admission segmentation.

use sicu_ingest::EventLog;
use sicu_model::AdmissionPeriod;

use crate::error::{Result, TransformError};
use crate::sequence::{date_part, ordered_sequences};

/// Derives one admission period per `DatSeq` group.
///
/// Groups are taken in ascending integer order of their key; the n-th group
/// becomes `admission{n}`. Start and end are the dates of the group's
/// earliest and latest timestamps.
pub fn segment_admissions(log: &EventLog) -> Result<Vec<AdmissionPeriod>> {
    let periods = ordered_sequences(log)?
        .into_iter()
        .map(|sequence| {
            let (first, last) = match (
                sequence.group.keys().next(),
                sequence.group.keys().next_back(),
            ) {
                (Some(first), Some(last)) => (first, last),
                _ => {
                    return Err(TransformError::EmptySequence {
                        sequence: sequence.key.to_string(),
                    });
                }
            };
            Ok(AdmissionPeriod {
                start: date_part(first).to_string(),
                end: date_part(last).to_string(),
                id: sequence.admission_id(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        patient_id = log.patient_id,
        admissions = periods.len(),
        "segmented admissions"
    );
    Ok(periods)
}
