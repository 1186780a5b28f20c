//! Numeric ordering of `DatSeq` groups and timestamp splitting.

use sicu_ingest::{EventLog, SequenceGroup};
use sicu_model::AdmissionPeriod;

use crate::error::{Result, TransformError};

/// A `DatSeq` group together with the admission it stands for.
#[derive(Debug, Clone, Copy)]
pub struct OrderedSequence<'a> {
    /// 1-based position in ascending key order.
    pub ordinal: usize,
    pub key: &'a str,
    pub group: &'a SequenceGroup,
}

impl OrderedSequence<'_> {
    pub fn admission_id(&self) -> String {
        AdmissionPeriod::label(self.ordinal)
    }
}

/// Orders `DatSeq` groups by the integer value of their key.
///
/// `"10"` sorts after `"2"`. Keys that spell the same integer (`"1"`,
/// `"01"`) keep a stable order by their text.
pub fn ordered_sequences(log: &EventLog) -> Result<Vec<OrderedSequence<'_>>> {
    let mut keyed = log
        .sequences
        .iter()
        .map(|(key, group)| {
            key.trim()
                .parse::<i64>()
                .map(|index| (index, key.as_str(), group))
                .map_err(|_| TransformError::InvalidSequenceKey { key: key.clone() })
        })
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    Ok(keyed
        .into_iter()
        .enumerate()
        .map(|(position, (_, key, group))| OrderedSequence {
            ordinal: position + 1,
            key,
            group,
        })
        .collect())
}

/// Date portion of a timestamp: everything before the first space.
pub(crate) fn date_part(timestamp: &str) -> &str {
    timestamp.split(' ').next().unwrap_or(timestamp)
}

/// Splits `YYYY-MM-DD HH:MM:SS.fff` into date and whole-second time.
pub fn split_timestamp(timestamp: &str) -> Result<(&str, &str)> {
    let (date, rest) =
        timestamp
            .split_once(' ')
            .ok_or_else(|| TransformError::MalformedTimestamp {
                timestamp: timestamp.to_string(),
            })?;
    let time = rest.split('.').next().unwrap_or(rest);
    Ok((date, time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn log_with_keys(keys: &[&str]) -> EventLog {
        let sequences = keys
            .iter()
            .map(|key| {
                let group = BTreeMap::from([(
                    format!("2024-09-0{} 00:00:00", key.len()),
                    vec![serde_json::json!({})],
                )]);
                (key.to_string(), group)
            })
            .collect();
        EventLog {
            patient_id: 1,
            path: PathBuf::from("1.json"),
            sequences,
        }
    }

    #[test]
    fn orders_by_integer_value() {
        let log = log_with_keys(&["10", "2", "1"]);
        let ordered = ordered_sequences(&log).unwrap();
        let keys: Vec<&str> = ordered.iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["1", "2", "10"]);
        assert_eq!(ordered[2].admission_id(), "admission3");
    }

    #[test]
    fn rejects_non_integer_key() {
        let log = log_with_keys(&["1", "first"]);
        assert!(matches!(
            ordered_sequences(&log),
            Err(TransformError::InvalidSequenceKey { key }) if key == "first"
        ));
    }

    #[test]
    fn splits_and_truncates_fraction() {
        assert_eq!(
            split_timestamp("2024-09-09 12:50:00.512").unwrap(),
            ("2024-09-09", "12:50:00")
        );
        assert_eq!(
            split_timestamp("2024-09-09 12:50:00").unwrap(),
            ("2024-09-09", "12:50:00")
        );
        assert!(split_timestamp("2024-09-09T12:50:00").is_err());
    }

    #[test]
    fn date_part_without_space_is_whole_value() {
        assert_eq!(date_part("2024-09-09 01:00:00"), "2024-09-09");
        assert_eq!(date_part("2024-09-09"), "2024-09-09");
    }
}
