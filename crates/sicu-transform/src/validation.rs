//! Alarm review against nursing records.
//!
//! Two read-side passes over a built [`PatientDocument`]:
//!
//! - [`validate_alarms`] judges each alarm true when a nursing entry within
//!   the window matches a row of the [`TrueAlarmList`].
//! - [`retain_alarms_with_nursing`] drops alarms with no nursing entry
//!   within the window, together with their waveform bundles.

use std::collections::BTreeSet;

use chrono::TimeDelta;
use sicu_ingest::TrueAlarmRecord;
use sicu_model::{NursingEntry, PatientDocument, SeverityColor};

use crate::error::{Result, TransformError};

/// Comparison form of a nursing cell: trimmed, lowercased, with spaces and
/// parentheses removed. Missing cells compare as empty.
pub fn normalize_cell(value: Option<&str>) -> String {
    value
        .unwrap_or_default()
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '(' | ')'))
        .collect()
}

/// Protocol, intervention, activity, attribute code and attribute value.
type RuleKey = [String; 5];

fn entry_key(entry: &NursingEntry) -> RuleKey {
    [
        entry.protocol.as_deref(),
        entry.intervention.as_deref(),
        entry.activity.as_deref(),
        entry.attribute_code.as_deref(),
        entry.attribute_value.as_deref(),
    ]
    .map(normalize_cell)
}

/// Nursing actions that mark an alarm as genuine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrueAlarmList {
    rules: BTreeSet<RuleKey>,
}

impl TrueAlarmList {
    pub fn new(records: &[TrueAlarmRecord]) -> Self {
        let rules = records
            .iter()
            .map(|record| {
                [
                    &record.protocol,
                    &record.intervention,
                    &record.activity,
                    &record.attribute_code,
                    &record.attribute_value,
                ]
                .map(|value| normalize_cell(Some(value.as_str())))
            })
            .collect();
        Self { rules }
    }

    /// Returns true when all five compared cells match one rule.
    pub fn matches(&self, entry: &NursingEntry) -> bool {
        self.rules.contains(&entry_key(entry))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Outcome of judging one alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmVerdict {
    pub admission_id: String,
    pub alarm_id: String,
    pub timestamp: String,
    pub color: SeverityColor,
    /// Nursing entries inside the window.
    pub nursing_records: usize,
    /// Execution time of the first matching entry.
    pub matched_at: Option<String>,
}

impl AlarmVerdict {
    pub fn is_true(&self) -> bool {
        self.matched_at.is_some()
    }
}

/// Judges every alarm of the document, in admission/date/time order.
///
/// Nursing entries are checked in timestamp order; the first one matching
/// the list decides. An alarm without nursing entries in the window is
/// false.
pub fn validate_alarms(
    document: &PatientDocument,
    list: &TrueAlarmList,
    window: TimeDelta,
) -> Result<Vec<AlarmVerdict>> {
    document
        .iter_alarms()
        .map(|(admission_id, alarm)| -> Result<AlarmVerdict> {
            let nearby = document
                .nursing_records_near(&alarm.timestamp, window)
                .map_err(|source| TransformError::NursingWindow {
                    alarm_id: alarm.id.clone(),
                    source,
                })?;
            let matched_at = nearby
                .iter()
                .find(|entry| list.matches(entry))
                .map(|entry| entry.performed_at.clone());
            Ok(AlarmVerdict {
                admission_id: admission_id.to_string(),
                alarm_id: alarm.id.clone(),
                timestamp: alarm.timestamp.clone(),
                color: alarm.color,
                nursing_records: nearby.len(),
                matched_at,
            })
        })
        .collect()
}

/// Removes alarms with no nursing entry within `window`, and their waveform
/// bundles. Date buckets left empty are removed. Returns the number of
/// alarms removed.
pub fn retain_alarms_with_nursing(
    document: &mut PatientDocument,
    window: TimeDelta,
) -> Result<usize> {
    let mut unattended = BTreeSet::new();
    for (_, alarm) in document.iter_alarms() {
        let nearby = document
            .nursing_records_near(&alarm.timestamp, window)
            .map_err(|source| TransformError::NursingWindow {
                alarm_id: alarm.id.clone(),
                source,
            })?;
        if nearby.is_empty() {
            unattended.insert(alarm.waveform_key.clone());
        }
    }
    if unattended.is_empty() {
        return Ok(0);
    }

    let mut removed = 0;
    for dates in document.alarms.values_mut() {
        for alarms in dates.values_mut() {
            let before = alarms.len();
            alarms.retain(|alarm| !unattended.contains(&alarm.waveform_key));
            removed += before - alarms.len();
        }
        dates.retain(|_, alarms| !alarms.is_empty());
    }
    document
        .waveforms
        .retain(|key, _| !unattended.contains(key));

    tracing::debug!(removed, "dropped alarms without nearby nursing records");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_cell_ignores_case_spaces_and_parentheses() {
        assert_eq!(normalize_cell(Some(" ECG (Lead) Check ")), "ecgleadcheck");
        assert_eq!(normalize_cell(Some("간호 활동(코드)")), "간호활동코드");
        assert_eq!(normalize_cell(None), "");
    }

    #[test]
    fn list_matches_on_all_five_columns() {
        let list = TrueAlarmList::new(&[TrueAlarmRecord {
            protocol: "Risk".to_string(),
            intervention: "Monitoring ".to_string(),
            activity: "Check (lead)".to_string(),
            attribute_code: "ECG".to_string(),
            attribute_value: String::new(),
        }]);
        let entry = NursingEntry {
            performed_at: "2024-09-09 12:40:00".to_string(),
            protocol: Some("risk".to_string()),
            intervention: Some("MONITORING".to_string()),
            activity: Some("check lead".to_string()),
            attribute_code: Some("ECG".to_string()),
            duty: Some("Day".to_string()),
            ..NursingEntry::default()
        };

        assert!(list.matches(&entry));
        assert!(!list.matches(&NursingEntry {
            attribute_value: Some("v".to_string()),
            ..entry
        }));
    }
}
