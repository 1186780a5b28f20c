//! Alarm events and monitor severity colors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alarm priority as rendered by the bedside monitor.
///
/// The monitor exports a numeric code in `Severity[0]`; the mapping is fixed:
///
/// | Code | Color       |
/// |------|-------------|
/// | 0    | Red         |
/// | 1    | Yellow      |
/// | 2    | ShortYellow |
/// | 3    | SevereCyan  |
/// | 4    | Cyan        |
/// | 5    | SilentCyan  |
/// | 6    | White       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeverityColor {
    Red,
    Yellow,
    ShortYellow,
    SevereCyan,
    Cyan,
    SilentCyan,
    White,
}

impl SeverityColor {
    pub const ALL: [SeverityColor; 7] = [
        SeverityColor::Red,
        SeverityColor::Yellow,
        SeverityColor::ShortYellow,
        SeverityColor::SevereCyan,
        SeverityColor::Cyan,
        SeverityColor::SilentCyan,
        SeverityColor::White,
    ];

    /// Maps a monitor severity code. Codes outside 0..=6 have no color.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(SeverityColor::Red),
            1 => Some(SeverityColor::Yellow),
            2 => Some(SeverityColor::ShortYellow),
            3 => Some(SeverityColor::SevereCyan),
            4 => Some(SeverityColor::Cyan),
            5 => Some(SeverityColor::SilentCyan),
            6 => Some(SeverityColor::White),
            _ => None,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            SeverityColor::Red => 0,
            SeverityColor::Yellow => 1,
            SeverityColor::ShortYellow => 2,
            SeverityColor::SevereCyan => 3,
            SeverityColor::Cyan => 4,
            SeverityColor::SilentCyan => 5,
            SeverityColor::White => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityColor::Red => "Red",
            SeverityColor::Yellow => "Yellow",
            SeverityColor::ShortYellow => "ShortYellow",
            SeverityColor::SevereCyan => "SevereCyan",
            SeverityColor::Cyan => "Cyan",
            SeverityColor::SilentCyan => "SilentCyan",
            SeverityColor::White => "White",
        }
    }

    /// Display color used by the review viewer.
    pub fn hex(&self) -> &'static str {
        match self {
            SeverityColor::Red => "#FF0000",
            SeverityColor::Yellow | SeverityColor::ShortYellow => "#FFFF00",
            SeverityColor::SevereCyan | SeverityColor::Cyan | SeverityColor::SilentCyan => {
                "#00FFFF"
            }
            SeverityColor::White => "#FFFFFF",
        }
    }
}

impl fmt::Display for SeverityColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SeverityColor {
    type Err = String;

    /// Parses a color name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SeverityColor::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("Unknown severity color: {s}"))
    }
}

/// One whitelisted alarm, stored under `alarms[admission][date]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmEvent {
    /// Wall-clock time truncated to whole seconds (`HH:MM:SS`).
    pub time: String,
    pub color: SeverityColor,
    /// `{patient}-{date}-{time}`.
    pub id: String,
    /// `{date} {time}`, second precision.
    pub timestamp: String,
    /// Full-precision source timestamp; key of the matching waveform bundle.
    pub waveform_key: String,
}

impl AlarmEvent {
    pub fn alarm_id(patient_id: i64, date: &str, time: &str) -> String {
        format!("{patient_id}-{date}-{time}")
    }
}
