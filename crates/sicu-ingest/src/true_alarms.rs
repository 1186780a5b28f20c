//! True-alarm list loading.
//!
//! The list is a tab-separated nursing export excerpt. Each row names the
//! protocol, intervention, activity, attribute code and attribute value of
//! a nursing action that confirms an alarm was genuine. Other columns are
//! ignored.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{IngestError, Result};
use crate::nursing::{NursingColumns, csv_error, normalize_header, open_error};

/// One row of the true-alarm list. Missing cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrueAlarmRecord {
    pub protocol: String,
    pub intervention: String,
    pub activity: String,
    pub attribute_code: String,
    pub attribute_value: String,
}

/// Reads a true-alarm list.
///
/// Headers are resolved with the same names as the nursing export
/// (`columns`), so only the five compared columns are required.
pub fn read_true_alarm_list(
    path: &Path,
    columns: &NursingColumns,
    delimiter: u8,
) -> Result<Vec<TrueAlarmRecord>> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, &e))?
        .iter()
        .map(normalize_header)
        .collect();
    let find = |name: &str| -> Result<usize> {
        let wanted = normalize_header(name);
        headers
            .iter()
            .position(|header| *header == wanted)
            .ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
                path: path.to_path_buf(),
            })
    };
    let layout = [
        find(&columns.protocol)?,
        find(&columns.intervention)?,
        find(&columns.activity)?,
        find(&columns.attribute_code)?,
        find(&columns.attribute_value)?,
    ];

    let mut records = Vec::new();
    for record_result in reader.records() {
        let record = record_result.map_err(|e| csv_error(path, &e))?;
        let [protocol, intervention, activity, attribute_code, attribute_value] =
            layout.map(|index| text(&record, index));
        if [&protocol, &intervention, &activity, &attribute_code, &attribute_value]
            .iter()
            .all(|value| value.trim().is_empty())
        {
            continue;
        }
        records.push(TrueAlarmRecord {
            protocol,
            intervention,
            activity,
            attribute_code,
            attribute_value,
        });
    }

    tracing::info!(path = %path.display(), records = records.len(), "loaded true-alarm list");
    Ok(records)
}

fn text(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "간호진단프로토콜(코드명)\t간호중재(코드명) \t간호활동(코드명) \t간호속성코드(코드명)\t간호속성명칭\t속성";

    fn create_temp_tsv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_reads_compared_columns() {
        let file = create_temp_tsv(&format!(
            "{HEADER}\nRisk\tMonitoring\tCheck lead\tECG\tignored\tReattached\n\t\t\t\t\t\n"
        ));
        let records =
            read_true_alarm_list(file.path(), &NursingColumns::default(), b'\t').unwrap();

        assert_eq!(
            records,
            vec![TrueAlarmRecord {
                protocol: "Risk".to_string(),
                intervention: "Monitoring".to_string(),
                activity: "Check lead".to_string(),
                attribute_code: "ECG".to_string(),
                attribute_value: "Reattached".to_string(),
            }]
        );
    }

    #[test]
    fn test_short_rows_leave_cells_empty() {
        let file = create_temp_tsv(&format!("{HEADER}\nRisk\tMonitoring\n"));
        let records =
            read_true_alarm_list(file.path(), &NursingColumns::default(), b'\t').unwrap();

        assert_eq!(records[0].intervention, "Monitoring");
        assert_eq!(records[0].attribute_value, "");
    }

    #[test]
    fn test_missing_column() {
        let file = create_temp_tsv("간호진단프로토콜(코드명)\t속성\nRisk\tv\n");
        let result = read_true_alarm_list(file.path(), &NursingColumns::default(), b'\t');
        assert!(matches!(result, Err(IngestError::MissingColumn { .. })));
    }
}
