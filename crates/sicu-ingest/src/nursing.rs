//! Nursing record CSV loading.

use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use sicu_model::NursingEntry;

use crate::error::{IngestError, Result};

/// Header names of the nursing export.
///
/// Defaults match the hospital EMR export. Matching ignores surrounding
/// whitespace, repeated inner whitespace and a leading BOM, since the export
/// ships some headers with trailing spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NursingColumns {
    pub patient_id: String,
    pub intervention: String,
    pub activity: String,
    pub attribute_code: String,
    pub attribute_value: String,
    pub duty: String,
    pub performed_at: String,
    pub protocol: String,
}

impl Default for NursingColumns {
    fn default() -> Self {
        Self {
            patient_id: "환자번호".to_string(),
            intervention: "간호중재(코드명)".to_string(),
            activity: "간호활동(코드명)".to_string(),
            attribute_code: "간호속성코드(코드명)".to_string(),
            attribute_value: "속성".to_string(),
            duty: "Duty(코드명)".to_string(),
            performed_at: "시행일시".to_string(),
            protocol: "간호진단프로토콜(코드명)".to_string(),
        }
    }
}

/// One CSV row that belongs to a known patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NursingRow {
    pub patient_id: i64,
    pub entry: NursingEntry,
}

/// The nursing export, in source row order.
#[derive(Debug, Clone, Default)]
pub struct NursingTable {
    pub rows: Vec<NursingRow>,
}

impl NursingTable {
    pub fn new(rows: Vec<NursingRow>) -> Self {
        Self { rows }
    }

    /// Distinct patient identifiers, ascending.
    pub fn patient_ids(&self) -> BTreeSet<i64> {
        self.rows.iter().map(|row| row.patient_id).collect()
    }

    /// Rows for one patient, in source order.
    pub fn rows_for(&self, patient_id: i64) -> impl Iterator<Item = &NursingRow> {
        self.rows
            .iter()
            .filter(move |row| row.patient_id == patient_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Resolved column indices.
struct ColumnLayout {
    patient_id: usize,
    intervention: usize,
    activity: usize,
    attribute_code: usize,
    attribute_value: usize,
    duty: usize,
    performed_at: usize,
    protocol: usize,
}

impl ColumnLayout {
    fn resolve(headers: &StringRecord, columns: &NursingColumns, path: &Path) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |name: &str| -> Result<usize> {
            let wanted = normalize_header(name);
            normalized
                .iter()
                .position(|header| *header == wanted)
                .ok_or_else(|| IngestError::MissingColumn {
                    column: name.to_string(),
                    path: path.to_path_buf(),
                })
        };
        Ok(Self {
            patient_id: find(&columns.patient_id)?,
            intervention: find(&columns.intervention)?,
            activity: find(&columns.activity)?,
            attribute_code: find(&columns.attribute_code)?,
            attribute_value: find(&columns.attribute_value)?,
            duty: find(&columns.duty)?,
            performed_at: find(&columns.performed_at)?,
            protocol: find(&columns.protocol)?,
        })
    }
}

pub(crate) fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cell value verbatim; empty cells are missing.
fn cell(record: &StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Accepts `123` and the float spelling `123.0` some exports produce.
fn parse_patient_id(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    let float: f64 = raw.parse().ok()?;
    (float.is_finite() && float.fract() == 0.0).then_some(float as i64)
}

pub(crate) fn open_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

pub(crate) fn csv_error(path: &Path, err: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Reads the nursing export.
///
/// Rows whose patient identifier is not an integer, and rows without an
/// execution timestamp, are dropped with a warning: neither can be joined
/// to an event log or grouped.
pub fn read_nursing_table(
    path: &Path,
    columns: &NursingColumns,
    delimiter: u8,
) -> Result<NursingTable> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| csv_error(path, &e))?.clone();
    let layout = ColumnLayout::resolve(&headers, columns, path)?;

    let mut rows = Vec::new();
    let mut invalid_ids = 0usize;
    let mut missing_timestamps = 0usize;

    for record_result in reader.records() {
        let record = record_result.map_err(|e| csv_error(path, &e))?;

        let Some(patient_id) = parse_patient_id(record.get(layout.patient_id)) else {
            invalid_ids += 1;
            continue;
        };
        let Some(performed_at) = cell(&record, layout.performed_at)
            .filter(|value| !value.trim().is_empty())
        else {
            missing_timestamps += 1;
            continue;
        };

        rows.push(NursingRow {
            patient_id,
            entry: NursingEntry {
                performed_at,
                intervention: cell(&record, layout.intervention),
                activity: cell(&record, layout.activity),
                attribute_code: cell(&record, layout.attribute_code),
                attribute_value: cell(&record, layout.attribute_value),
                duty: cell(&record, layout.duty),
                protocol: cell(&record, layout.protocol),
            },
        });
    }

    if invalid_ids > 0 {
        tracing::warn!(
            path = %path.display(),
            rows = invalid_ids,
            "dropped nursing rows with a non-integer patient identifier"
        );
    }
    if missing_timestamps > 0 {
        tracing::warn!(
            path = %path.display(),
            rows = missing_timestamps,
            "dropped nursing rows without an execution timestamp"
        );
    }
    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded nursing table");

    Ok(NursingTable::new(rows))
}
