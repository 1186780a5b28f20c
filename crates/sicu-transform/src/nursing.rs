//! Nursing record indexing.

use sicu_ingest::NursingTable;
use sicu_model::NursingRecords;

/// Groups one patient's nursing rows by execution timestamp.
///
/// Entries that share a timestamp keep their CSV row order. Rows of other
/// patients are ignored; a patient with no rows yields an empty map.
pub fn index_nursing_records(table: &NursingTable, patient_id: i64) -> NursingRecords {
    let mut records = NursingRecords::new();
    for row in table.rows_for(patient_id) {
        records
            .entry(row.entry.performed_at.clone())
            .or_default()
            .push(row.entry.clone());
    }
    tracing::debug!(
        patient_id,
        timestamps = records.len(),
        "indexed nursing records"
    );
    records
}
