//! Waveform bundles captured at alarm instants.

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Numeric channels exported with every alarm record, in monitor order.
pub const NUMERIC_CHANNELS: [&str; 8] = ["SpO2", "Pulse", "ST", "Tskin", "ABP", "NBP", "Perf", "PPV"];

/// Waveform channels exported with every alarm record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveChannel {
    /// Arterial blood pressure.
    Abp,
    /// ECG lead II.
    LeadII,
    /// Respiration.
    Resp,
    /// Plethysmography.
    Pleth,
}

impl WaveChannel {
    pub const ALL: [WaveChannel; 4] = [
        WaveChannel::Abp,
        WaveChannel::LeadII,
        WaveChannel::Resp,
        WaveChannel::Pleth,
    ];

    /// Channel prefix used in the event log (`{prefix}_wave`).
    pub fn source_prefix(&self) -> &'static str {
        match self {
            WaveChannel::Abp => "ABP",
            WaveChannel::LeadII => "II",
            WaveChannel::Resp => "Resp",
            WaveChannel::Pleth => "Pleth",
        }
    }

    /// Key of the channel inside a serialized bundle.
    pub fn bundle_key(&self) -> &'static str {
        match self {
            WaveChannel::Abp => "ABP",
            WaveChannel::LeadII => "Lead-II",
            WaveChannel::Resp => "Resp",
            WaveChannel::Pleth => "Pleth",
        }
    }
}

/// A numeric vital as `[value, time offset in seconds]`.
///
/// The value passes through from the monitor export untouched; it is a
/// number in practice but may be a string or null for invalid readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericReading(pub serde_json::Value, pub Option<f64>);

impl NumericReading {
    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn time_diff_sec(&self) -> Option<f64> {
        self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformBundle {
    #[serde(rename = "ABP")]
    pub abp: String,
    #[serde(rename = "Lead-II")]
    pub lead_ii: String,
    #[serde(rename = "Resp")]
    pub resp: String,
    #[serde(rename = "Pleth")]
    pub pleth: String,
    /// Numeric vitals keyed by the monitor's own label.
    #[serde(rename = "Numeric")]
    pub numeric: BTreeMap<String, NumericReading>,
    /// Normalized `" / "`-joined alarm labels.
    #[serde(rename = "AlarmLabel")]
    pub alarm_label: String,
}

impl WaveformBundle {
    pub fn blob(&self, channel: WaveChannel) -> &str {
        match channel {
            WaveChannel::Abp => &self.abp,
            WaveChannel::LeadII => &self.lead_ii,
            WaveChannel::Resp => &self.resp,
            WaveChannel::Pleth => &self.pleth,
        }
    }

    /// Decodes one channel into calibrated samples.
    pub fn samples(&self, channel: WaveChannel) -> Result<Vec<f64>> {
        decode_waveform(self.blob(channel))
    }
}

/// Decodes a `WaveSamples_Base64_cal` blob: base64 over little-endian f64.
pub fn decode_waveform(blob: &str) -> Result<Vec<f64>> {
    let bytes = general_purpose::STANDARD
        .decode(blob.trim())
        .map_err(|source| ModelError::InvalidBase64 { source })?;
    if bytes.len() % 8 != 0 {
        return Err(ModelError::InvalidSampleLength { len: bytes.len() });
    }
    let samples = bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect();
    Ok(samples)
}
