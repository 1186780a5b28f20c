//! Alarm and waveform extraction.
//!
//! Only entries whose first detail record carries at least one whitelisted
//! label are extracted. Each kept entry produces an [`AlarmEvent`] under
//! `alarms[admission][date]` and a [`WaveformBundle`] keyed by the full
//! source timestamp.
//!
//! A kept entry with a missing or malformed field fails the whole
//! extraction; skipped entries are never inspected beyond their labels.

use sicu_ingest::EventLog;
use sicu_model::{
    AlarmEvent, AlarmIndex, NUMERIC_CHANNELS, WaveChannel, WaveformBundle, WaveformMap,
};

use crate::error::Result;
use crate::record::DetailRecord;
use crate::sequence::{ordered_sequences, split_timestamp};
use crate::whitelist::{AlarmWhitelist, composite_label};

/// Output of [`extract_alarms`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlarmExtraction {
    pub alarms: AlarmIndex,
    pub waveforms: WaveformMap,
    /// Entries dropped because none of their labels is whitelisted.
    pub skipped: usize,
}

/// Extracts whitelisted alarms and their waveform bundles from one event log.
pub fn extract_alarms(log: &EventLog, whitelist: &AlarmWhitelist) -> Result<AlarmExtraction> {
    let mut extraction = AlarmExtraction::default();

    for sequence in ordered_sequences(log)? {
        let admission_id = sequence.admission_id();

        for (timestamp, records) in sequence.group {
            let record = DetailRecord::first(timestamp, records)?;
            let labels = record.labels()?;
            if !whitelist.matches_any(&labels) {
                extraction.skipped += 1;
                continue;
            }

            let (date, time) = split_timestamp(timestamp)?;
            let event = AlarmEvent {
                time: time.to_string(),
                color: record.severity()?,
                id: AlarmEvent::alarm_id(log.patient_id, date, time),
                timestamp: format!("{date} {time}"),
                waveform_key: timestamp.clone(),
            };
            let bundle = build_bundle(&record, &labels)?;

            extraction
                .alarms
                .entry(admission_id.clone())
                .or_default()
                .entry(date.to_string())
                .or_default()
                .push(event);
            extraction.waveforms.insert(timestamp.clone(), bundle);
        }
    }

    tracing::debug!(
        patient_id = log.patient_id,
        alarms = extraction.waveforms.len(),
        skipped = extraction.skipped,
        "extracted alarms"
    );
    Ok(extraction)
}

fn build_bundle(record: &DetailRecord<'_>, labels: &[&str]) -> Result<WaveformBundle> {
    let numeric = NUMERIC_CHANNELS
        .iter()
        .map(|channel| record.numeric(channel))
        .collect::<Result<_>>()?;

    Ok(WaveformBundle {
        abp: record.wave_blob(WaveChannel::Abp)?,
        lead_ii: record.wave_blob(WaveChannel::LeadII)?,
        resp: record.wave_blob(WaveChannel::Resp)?,
        pleth: record.wave_blob(WaveChannel::Pleth)?,
        numeric,
        alarm_label: composite_label(labels),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use serde_json::{Value, json};
    use sicu_model::{NumericReading, SeverityColor};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn record(labels: &[&str], severity: i64) -> Value {
        let mut fields = serde_json::Map::new();
        fields.insert("Label".into(), json!(labels));
        fields.insert("Severity".into(), json!([severity]));
        for channel in WaveChannel::ALL {
            let prefix = channel.source_prefix();
            fields.insert(
                format!("{prefix}_wave"),
                json!({"WaveSamples_Base64_cal": format!("{prefix}-blob")}),
            );
            fields.insert(format!("{prefix}_time_diff_sec"), json!(0.0));
        }
        for channel in NUMERIC_CHANNELS {
            fields.insert(
                format!("{channel}_numeric"),
                json!({"Label": channel, "Value": 1}),
            );
            fields.insert(format!("{channel}_numeric_time_diff_sec"), json!(0.5));
        }
        Value::Object(fields)
    }

    fn log(groups: Vec<(&str, Vec<(&str, Value)>)>) -> EventLog {
        EventLog {
            patient_id: 11572411,
            path: PathBuf::from("11572411.json"),
            sequences: groups
                .into_iter()
                .map(|(key, entries)| {
                    let group = entries
                        .into_iter()
                        .map(|(ts, record)| (ts.to_string(), vec![record]))
                        .collect();
                    (key.to_string(), group)
                })
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn keeps_whitelisted_entry() {
        let log = log(vec![(
            "1",
            vec![(
                "2024-09-09 12:50:00.512",
                record(&["!!SpO2  Sensor Off?", "Pulse"], 3),
            )],
        )]);

        let extraction = extract_alarms(&log, AlarmWhitelist::builtin()).unwrap();

        let events = &extraction.alarms["admission1"]["2024-09-09"];
        assert_eq!(
            events,
            &vec![AlarmEvent {
                time: "12:50:00".to_string(),
                color: SeverityColor::SevereCyan,
                id: "11572411-2024-09-09-12:50:00".to_string(),
                timestamp: "2024-09-09 12:50:00".to_string(),
                waveform_key: "2024-09-09 12:50:00.512".to_string(),
            }]
        );

        let bundle = &extraction.waveforms["2024-09-09 12:50:00.512"];
        assert_eq!(bundle.alarm_label, "SpO2 Sensor Off / Pulse");
        assert_eq!(bundle.lead_ii, "II-blob");
        assert_eq!(bundle.numeric.len(), NUMERIC_CHANNELS.len());
        assert_eq!(bundle.numeric["PPV"], NumericReading(json!(1), Some(0.5)));
        assert_eq!(extraction.skipped, 0);
    }

    #[test]
    fn skips_unlisted_entry_without_reading_fields() {
        let log = log(vec![(
            "1",
            vec![
                (
                    "2024-09-09 12:00:00.000",
                    json!({"Label": ["Normal Sinus Rhythm"]}),
                ),
                ("2024-09-09 12:00:01.000", record(&["ECG Leads Off"], 0)),
            ],
        )]);

        let extraction = extract_alarms(&log, AlarmWhitelist::builtin()).unwrap();

        assert_eq!(extraction.skipped, 1);
        assert_eq!(extraction.waveforms.len(), 1);
        assert!(
            extraction
                .waveforms
                .contains_key("2024-09-09 12:00:01.000")
        );
    }

    #[test]
    fn buckets_by_admission_and_date() {
        let log = log(vec![
            (
                "1",
                vec![
                    ("2024-09-09 23:59:59.000", record(&["ECG Leads Off"], 1)),
                    ("2024-09-10 00:00:01.000", record(&["ECG Leads Off"], 1)),
                ],
            ),
            (
                "2",
                vec![("2024-10-01 08:00:00.000", record(&["ECG Leads Off"], 1))],
            ),
        ]);

        let extraction = extract_alarms(&log, AlarmWhitelist::builtin()).unwrap();

        let admission1: Vec<&String> = extraction.alarms["admission1"].keys().collect();
        assert_eq!(admission1, vec!["2024-09-09", "2024-09-10"]);
        assert_eq!(extraction.alarms["admission2"]["2024-10-01"].len(), 1);
    }

    #[test]
    fn missing_wave_fails_the_log() {
        let mut broken = record(&["ECG Leads Off"], 0);
        broken.as_object_mut().unwrap().remove("Resp_wave");
        let log = log(vec![("1", vec![("2024-09-09 12:00:00.000", broken)])]);

        let err = extract_alarms(&log, AlarmWhitelist::builtin()).unwrap_err();
        assert_eq!(err.kind(), "missing-field");
    }

    #[test]
    fn unknown_severity_fails_the_log() {
        let log = log(vec![(
            "1",
            vec![("2024-09-09 12:00:00.000", record(&["ECG Leads Off"], 7))],
        )]);
        assert!(matches!(
            extract_alarms(&log, AlarmWhitelist::builtin()),
            Err(TransformError::UnknownSeverity { code: 7, .. })
        ));
    }
}
