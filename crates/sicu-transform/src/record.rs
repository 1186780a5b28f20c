//! Typed access to one monitor detail record.
//!
//! Every accessor reports the exact field it needed, so a malformed export
//! surfaces as `MissingField`/`InvalidField` naming the entry and key.

use serde_json::{Map, Value};
use sicu_model::{NumericReading, SeverityColor, WaveChannel};

use crate::error::{Result, TransformError};

const LABEL: &str = "Label";
const SEVERITY: &str = "Severity";
const VALUE: &str = "Value";
const WAVE_SAMPLES: &str = "WaveSamples_Base64_cal";

/// First detail record stored under one timestamp.
pub(crate) struct DetailRecord<'a> {
    timestamp: &'a str,
    fields: &'a Map<String, Value>,
}

impl<'a> DetailRecord<'a> {
    /// Picks the first record of a timestamp entry.
    pub(crate) fn first(timestamp: &'a str, records: &'a [Value]) -> Result<Self> {
        let first = records
            .first()
            .ok_or_else(|| missing(timestamp, "[0]".to_string()))?;
        let fields = first
            .as_object()
            .ok_or_else(|| invalid(timestamp, "[0]".to_string(), "an object"))?;
        Ok(Self { timestamp, fields })
    }

    fn field(&self, name: &str) -> Result<&'a Value> {
        self.fields
            .get(name)
            .ok_or_else(|| missing(self.timestamp, name.to_string()))
    }

    fn object(&self, name: &str) -> Result<&'a Map<String, Value>> {
        self.field(name)?
            .as_object()
            .ok_or_else(|| invalid(self.timestamp, name.to_string(), "an object"))
    }

    /// `Label`: the alarm labels shown on the monitor.
    pub(crate) fn labels(&self) -> Result<Vec<&'a str>> {
        let values = self
            .field(LABEL)?
            .as_array()
            .ok_or_else(|| invalid(self.timestamp, LABEL.to_string(), "an array of strings"))?;
        values
            .iter()
            .map(|value| {
                value.as_str().ok_or_else(|| {
                    invalid(self.timestamp, LABEL.to_string(), "an array of strings")
                })
            })
            .collect()
    }

    /// `Severity[0]` resolved through the monitor color table.
    pub(crate) fn severity(&self) -> Result<SeverityColor> {
        let first = self
            .field(SEVERITY)?
            .as_array()
            .ok_or_else(|| invalid(self.timestamp, SEVERITY.to_string(), "an array"))?
            .first()
            .ok_or_else(|| missing(self.timestamp, format!("{SEVERITY}[0]")))?;
        let code = integer_code(first)
            .ok_or_else(|| invalid(self.timestamp, format!("{SEVERITY}[0]"), "an integer"))?;
        SeverityColor::from_code(code).ok_or_else(|| TransformError::UnknownSeverity {
            timestamp: self.timestamp.to_string(),
            code,
        })
    }

    /// `{channel}_wave.WaveSamples_Base64_cal`.
    pub(crate) fn wave_blob(&self, channel: WaveChannel) -> Result<String> {
        let name = format!("{}_wave", channel.source_prefix());
        let wave = self.object(&name)?;
        let blob = wave
            .get(WAVE_SAMPLES)
            .ok_or_else(|| missing(self.timestamp, format!("{name}.{WAVE_SAMPLES}")))?;
        blob.as_str()
            .map(str::to_string)
            .ok_or_else(|| invalid(self.timestamp, format!("{name}.{WAVE_SAMPLES}"), "a string"))
    }

    /// `{channel}_numeric.{Label,Value}` with `{channel}_numeric_time_diff_sec`.
    pub(crate) fn numeric(&self, channel: &str) -> Result<(String, NumericReading)> {
        let name = format!("{channel}_numeric");
        let numeric = self.object(&name)?;
        let label = numeric
            .get(LABEL)
            .ok_or_else(|| missing(self.timestamp, format!("{name}.{LABEL}")))?
            .as_str()
            .ok_or_else(|| invalid(self.timestamp, format!("{name}.{LABEL}"), "a string"))?;
        let value = numeric
            .get(VALUE)
            .ok_or_else(|| missing(self.timestamp, format!("{name}.{VALUE}")))?
            .clone();

        let diff_name = format!("{name}_time_diff_sec");
        let time_diff = match self.field(&diff_name)? {
            Value::Null => None,
            other => Some(
                other
                    .as_f64()
                    .ok_or_else(|| invalid(self.timestamp, diff_name.clone(), "a number"))?,
            ),
        };

        Ok((label.to_string(), NumericReading(value, time_diff)))
    }
}

/// Accepts `3` and `3.0`; the export writes severity as either.
fn integer_code(value: &Value) -> Option<i64> {
    if let Some(code) = value.as_i64() {
        return Some(code);
    }
    value
        .as_f64()
        .filter(|code| code.is_finite() && code.fract() == 0.0)
        .map(|code| code as i64)
}

fn missing(timestamp: &str, field: String) -> TransformError {
    TransformError::MissingField {
        timestamp: timestamp.to_string(),
        field,
    }
}

fn invalid(timestamp: &str, field: String, expected: &'static str) -> TransformError {
    TransformError::InvalidField {
        timestamp: timestamp.to_string(),
        field,
        expected,
    }
}
