//! Property tests for the patient document transformations.

use std::collections::BTreeMap;
use std::path::PathBuf;

use proptest::prelude::*;
use serde_json::{Value, json};
use sicu_ingest::{EventLog, NursingRow, NursingTable, SequenceGroup};
use sicu_model::{NUMERIC_CHANNELS, NursingEntry, SeverityColor, WaveChannel};
use sicu_transform::{
    AlarmWhitelist, TransformError, build_patient_document, extract_alarms,
    index_nursing_records, segment_admissions,
};

fn detail_record(label: &str, severity: i64) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert("Label".into(), json!([label]));
    fields.insert("Severity".into(), json!([severity]));
    for channel in WaveChannel::ALL {
        fields.insert(
            format!("{}_wave", channel.source_prefix()),
            json!({"WaveSamples_Base64_cal": "AAAAAAAA8D8="}),
        );
    }
    for channel in NUMERIC_CHANNELS {
        fields.insert(
            format!("{channel}_numeric"),
            json!({"Label": channel, "Value": 0}),
        );
        fields.insert(format!("{channel}_numeric_time_diff_sec"), Value::Null);
    }
    Value::Object(fields)
}

fn single_entry_log(timestamp: &str, record: Value) -> EventLog {
    let group: SequenceGroup = BTreeMap::from([(timestamp.to_string(), vec![record])]);
    EventLog {
        patient_id: 5,
        path: PathBuf::from("5.json"),
        sequences: BTreeMap::from([("1".to_string(), group)]),
    }
}

fn timestamp(day: u32, second: u32) -> String {
    format!(
        "2024-09-{:02} {:02}:{:02}:{:02}.000",
        day,
        second / 3600,
        (second / 60) % 60,
        second % 60
    )
}

proptest! {
    #[test]
    fn nursing_grouping_is_lossless(
        rows in prop::collection::vec((1i64..4, 0u32..6), 0..40)
    ) {
        let table = NursingTable::new(
            rows.iter()
                .enumerate()
                .map(|(index, (patient_id, slot))| NursingRow {
                    patient_id: *patient_id,
                    entry: NursingEntry {
                        performed_at: timestamp(1, *slot),
                        activity: Some(index.to_string()),
                        ..NursingEntry::default()
                    },
                })
                .collect(),
        );

        for patient_id in 1..4 {
            let records = index_nursing_records(&table, patient_id);
            let expected: Vec<&NursingRow> = table.rows_for(patient_id).collect();

            let total: usize = records.values().map(Vec::len).sum();
            prop_assert_eq!(total, expected.len());

            for (key, entries) in &records {
                let in_order: Vec<&NursingEntry> = expected
                    .iter()
                    .filter(|row| &row.entry.performed_at == key)
                    .map(|row| &row.entry)
                    .collect();
                prop_assert_eq!(entries.iter().collect::<Vec<_>>(), in_order);
            }
        }
    }

    #[test]
    fn admissions_follow_numeric_key_order(
        keys in prop::collection::btree_set(0i64..500, 1..12),
        days in prop::collection::vec((1u32..28, 1u32..28), 12)
    ) {
        let sequences: BTreeMap<String, SequenceGroup> = keys
            .iter()
            .zip(&days)
            .map(|(key, (a, b))| {
                let group = [*a, *b]
                    .iter()
                    .map(|day| (timestamp(*day, 0), vec![json!({})]))
                    .collect();
                (key.to_string(), group)
            })
            .collect();
        let log = EventLog { patient_id: 1, path: PathBuf::from("1.json"), sequences };

        let periods = segment_admissions(&log).unwrap();

        prop_assert_eq!(periods.len(), keys.len());
        for (index, ((_, (a, b)), period)) in keys.iter().zip(&days).zip(&periods).enumerate() {
            prop_assert_eq!(&period.id, &format!("admission{}", index + 1));
            prop_assert_eq!(&period.start, &format!("2024-09-{:02}", a.min(b)));
            prop_assert_eq!(&period.end, &format!("2024-09-{:02}", a.max(b)));
        }
    }

    #[test]
    fn only_whitelisted_labels_are_extracted(
        flags in prop::collection::vec(any::<bool>(), 1..20)
    ) {
        let group: SequenceGroup = flags
            .iter()
            .enumerate()
            .map(|(second, listed)| {
                let label = if *listed { "SpO2 Sensor Off" } else { "Normal Sinus Rhythm" };
                (timestamp(9, second as u32), vec![detail_record(label, 1)])
            })
            .collect();
        let log = EventLog {
            patient_id: 5,
            path: PathBuf::from("5.json"),
            sequences: BTreeMap::from([("1".to_string(), group)]),
        };

        let extraction = extract_alarms(&log, AlarmWhitelist::builtin()).unwrap();
        let listed = flags.iter().filter(|listed| **listed).count();

        prop_assert_eq!(extraction.waveforms.len(), listed);
        prop_assert_eq!(extraction.skipped, flags.len() - listed);
        let events: usize = extraction
            .alarms
            .values()
            .flat_map(|dates| dates.values())
            .map(Vec::len)
            .sum();
        prop_assert_eq!(events, listed);
        for bundle in extraction.waveforms.values() {
            prop_assert_eq!(bundle.alarm_label.as_str(), "SpO2 Sensor Off");
        }
    }
}

#[test]
fn unlisted_label_is_excluded_everywhere() {
    let log = single_entry_log(
        "2024-09-09 12:50:00.512",
        detail_record("Normal Sinus Rhythm", 0),
    );
    let document =
        build_patient_document(&log, &NursingTable::default(), AlarmWhitelist::builtin()).unwrap();
    assert!(document.alarms.is_empty());
    assert!(document.waveforms.is_empty());
    assert_eq!(document.admission_periods.len(), 1);
}

#[test]
fn severity_codes_map_to_colors() {
    for (code, color) in [(0, SeverityColor::Red), (6, SeverityColor::White)] {
        let log = single_entry_log(
            "2024-09-09 12:50:00.512",
            detail_record("SpO2 Sensor Off", code),
        );
        let extraction = extract_alarms(&log, AlarmWhitelist::builtin()).unwrap();
        assert_eq!(
            extraction.alarms["admission1"]["2024-09-09"][0].color,
            color
        );
    }

    let log = single_entry_log(
        "2024-09-09 12:50:00.512",
        detail_record("SpO2 Sensor Off", 7),
    );
    let err = extract_alarms(&log, AlarmWhitelist::builtin()).unwrap_err();
    assert!(matches!(err, TransformError::UnknownSeverity { code: 7, .. }));
    assert_eq!(err.kind(), "bad-severity");
}

#[test]
fn document_joins_alarm_to_waveform() {
    let log = single_entry_log(
        "2024-09-09 12:50:00.512",
        detail_record("SpO2 Sensor Off", 0),
    );
    let nursing = NursingTable::new(vec![NursingRow {
        patient_id: 5,
        entry: NursingEntry {
            performed_at: "2024-09-09 12:40:00".to_string(),
            ..NursingEntry::default()
        },
    }]);

    let document = build_patient_document(&log, &nursing, AlarmWhitelist::builtin()).unwrap();

    let alarm = &document.alarms["admission1"]["2024-09-09"][0];
    let bundle = document.waveform_for(alarm).unwrap();
    assert_eq!(bundle.samples(WaveChannel::Abp).unwrap(), vec![1.0]);
    assert_eq!(document.nursing_records.len(), 1);
}
