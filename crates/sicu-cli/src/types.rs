use sicu_model::{AdmissionPeriod, AlarmEvent, DocumentSummary, WaveformBundle};

/// One line of the `summary` table.
#[derive(Debug)]
pub struct DocumentRow {
    pub patient_id: i64,
    /// Counts, or the reason the document could not be read.
    pub summary: Result<DocumentSummary, String>,
}

#[derive(Debug)]
pub struct AdmissionRow<'a> {
    pub period: &'a AdmissionPeriod,
    /// Alarm count per date, ascending.
    pub dates: Vec<(&'a str, usize)>,
}

/// An alarm found at the inspected instant.
#[derive(Debug)]
pub struct AlarmDetail<'a> {
    pub admission_id: &'a str,
    pub alarm: &'a AlarmEvent,
    pub bundle: Option<&'a WaveformBundle>,
}
