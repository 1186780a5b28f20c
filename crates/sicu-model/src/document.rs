//! The per-patient output document and read-side queries over it.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::admission::AdmissionPeriod;
use crate::alarm::AlarmEvent;
use crate::error::{ModelError, Result};
use crate::nursing::NursingEntry;
use crate::waveform::WaveformBundle;

/// Nursing entries grouped by execution timestamp.
pub type NursingRecords = BTreeMap<String, Vec<NursingEntry>>;

/// Alarms keyed by admission id, then by date.
pub type AlarmIndex = BTreeMap<String, BTreeMap<String, Vec<AlarmEvent>>>;

/// Waveform bundles keyed by full-precision source timestamp.
pub type WaveformMap = BTreeMap<String, WaveformBundle>;

/// Window used by the review viewer when pairing alarms with nursing records.
pub const DEFAULT_NURSING_WINDOW_MINUTES: i64 = 30;

/// Parses `YYYY-MM-DD HH:MM:SS` with an optional fractional second.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M:%S%.f").map_err(|source| {
        ModelError::InvalidTimestamp {
            value: value.to_string(),
            source,
        }
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientDocument {
    pub admission_periods: Vec<AdmissionPeriod>,
    pub alarms: AlarmIndex,
    pub nursing_records: NursingRecords,
    pub waveforms: WaveformMap,
}

/// Entry counts for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub admission_periods: usize,
    pub alarms: usize,
    pub nursing_records: usize,
    pub waveforms: usize,
}

impl PatientDocument {
    /// Dates with at least one alarm in the given admission, ascending.
    pub fn available_dates(&self, admission_id: &str) -> Vec<&str> {
        self.alarms
            .get(admission_id)
            .map(|dates| dates.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn alarms_for_date(&self, admission_id: &str, date: &str) -> &[AlarmEvent] {
        self.alarms
            .get(admission_id)
            .and_then(|dates| dates.get(date))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates every alarm with its admission id, in admission/date order.
    pub fn iter_alarms(&self) -> impl Iterator<Item = (&str, &AlarmEvent)> {
        self.alarms.iter().flat_map(|(admission_id, dates)| {
            dates
                .values()
                .flatten()
                .map(move |alarm| (admission_id.as_str(), alarm))
        })
    }

    pub fn waveform_for(&self, alarm: &AlarmEvent) -> Option<&WaveformBundle> {
        self.waveforms.get(&alarm.waveform_key)
    }

    /// Nursing entries recorded within `window` of `at` (both ends inclusive).
    ///
    /// Groups whose timestamp key does not parse are skipped. Results follow
    /// timestamp order, and source row order within a timestamp.
    pub fn nursing_records_near(&self, at: &str, window: TimeDelta) -> Result<Vec<&NursingEntry>> {
        let center = parse_timestamp(at)?;
        let out_of_range = || ModelError::WindowOutOfRange {
            at: at.to_string(),
            window,
        };
        let start = center.checked_sub_signed(window).ok_or_else(out_of_range)?;
        let end = center.checked_add_signed(window).ok_or_else(out_of_range)?;

        let entries = self
            .nursing_records
            .iter()
            .filter(|(recorded_at, _)| {
                parse_timestamp(recorded_at)
                    .map(|recorded| start <= recorded && recorded <= end)
                    .unwrap_or(false)
            })
            .flat_map(|(_, entries)| entries.iter())
            .collect();
        Ok(entries)
    }

    pub fn alarm_count(&self) -> usize {
        self.alarms
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn nursing_entry_count(&self) -> usize {
        self.nursing_records.values().map(Vec::len).sum()
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            admission_periods: self.admission_periods.len(),
            alarms: self.alarm_count(),
            nursing_records: self.nursing_entry_count(),
            waveforms: self.waveforms.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::SeverityColor;

    fn entry(at: &str, activity: &str) -> NursingEntry {
        NursingEntry {
            performed_at: at.to_string(),
            intervention: None,
            activity: Some(activity.to_string()),
            attribute_code: None,
            attribute_value: None,
            duty: None,
            protocol: None,
        }
    }

    fn alarm(date: &str, time: &str, key: &str) -> AlarmEvent {
        AlarmEvent {
            time: time.to_string(),
            color: SeverityColor::Yellow,
            id: AlarmEvent::alarm_id(1, date, time),
            timestamp: format!("{date} {time}"),
            waveform_key: key.to_string(),
        }
    }

    #[test]
    fn parses_with_and_without_fraction() {
        assert!(parse_timestamp("2024-09-09 12:50:00").is_ok());
        assert!(parse_timestamp("2024-09-09 12:50:00.250").is_ok());
        assert!(parse_timestamp("2024-09-09").is_err());
    }

    #[test]
    fn nursing_window_is_inclusive() {
        let mut doc = PatientDocument::default();
        for at in [
            "2024-09-09 12:19:59",
            "2024-09-09 12:20:00",
            "2024-09-09 12:55:00",
            "2024-09-09 13:20:00",
            "2024-09-09 13:20:01",
        ] {
            doc.nursing_records
                .entry(at.to_string())
                .or_default()
                .push(entry(at, at));
        }

        let near = doc
            .nursing_records_near("2024-09-09 12:50:00", TimeDelta::minutes(30))
            .unwrap();
        let times: Vec<&str> = near.iter().map(|e| e.performed_at.as_str()).collect();
        assert_eq!(
            times,
            vec![
                "2024-09-09 12:20:00",
                "2024-09-09 12:55:00",
                "2024-09-09 13:20:00"
            ]
        );
    }

    #[test]
    fn nursing_window_rejects_bad_center() {
        let doc = PatientDocument::default();
        assert!(
            doc.nursing_records_near("yesterday", TimeDelta::minutes(30))
                .is_err()
        );
    }

    #[test]
    fn nursing_window_overflow_is_an_error() {
        let doc = PatientDocument::default();
        let window = TimeDelta::try_minutes(200_000_000_000).unwrap();
        let result = doc.nursing_records_near("2024-09-09 12:50:00", window);
        assert!(matches!(result, Err(ModelError::WindowOutOfRange { .. })));
    }

    #[test]
    fn counts_and_lookups() {
        let mut doc = PatientDocument::default();
        let dates = doc.alarms.entry("admission1".to_string()).or_default();
        dates.entry("2024-09-02".to_string()).or_default().push(alarm(
            "2024-09-02",
            "01:00:00",
            "2024-09-02 01:00:00.5",
        ));
        dates.entry("2024-09-01".to_string()).or_default().extend([
            alarm("2024-09-01", "10:00:00", "2024-09-01 10:00:00"),
            alarm("2024-09-01", "11:00:00", "2024-09-01 11:00:00"),
        ]);

        assert_eq!(doc.alarm_count(), 3);
        assert_eq!(
            doc.available_dates("admission1"),
            vec!["2024-09-01", "2024-09-02"]
        );
        assert_eq!(doc.alarms_for_date("admission1", "2024-09-01").len(), 2);
        assert!(doc.alarms_for_date("admission2", "2024-09-01").is_empty());
        assert!(doc.available_dates("admission9").is_empty());
        assert_eq!(doc.iter_alarms().count(), 3);
        assert_eq!(doc.summary().alarms, 3);
    }
}
