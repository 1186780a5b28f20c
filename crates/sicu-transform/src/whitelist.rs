//! Technical alarm whitelist and alarm label normalization.
//!
//! The whitelist names device-side conditions (lead-off, sensor
//! disconnect, noisy signal, equipment malfunction) whose alarms are kept
//! for review. The built-in list is embedded at compile time; a site list in
//! the same format can replace it at runtime.
//!
//! # List format
//!
//! One entry per line. A line containing `/` contributes each slash-separated
//! part as its own entry. Blank lines are ignored.

use std::collections::BTreeSet;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::LazyLock;

/// Built-in technical alarm list.
pub const BUILTIN_ALARM_LIST: &str = include_str!("../data/technical_alarms.txt");

static BUILTIN: LazyLock<AlarmWhitelist> =
    LazyLock::new(|| AlarmWhitelist::from_entries(BUILTIN_ALARM_LIST.lines()));

/// Cleans a monitor label for display: whitespace runs collapse to one
/// space, `?` and `!` markers are removed, ends are trimmed.
pub fn clean_label(label: &str) -> String {
    let stripped: String = label.chars().filter(|c| *c != '?' && *c != '!').collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key: cleaned, lowercased, with every space removed.
pub fn match_key(label: &str) -> String {
    clean_label(label)
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Joins a record's labels the way they are shown in the viewer.
pub fn composite_label<S: AsRef<str>>(labels: &[S]) -> String {
    let joined = labels
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" / ");
    clean_label(&joined)
}

/// Immutable set of normalized technical alarm labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmWhitelist {
    keys: BTreeSet<String>,
}

impl AlarmWhitelist {
    /// The embedded list, built once per process.
    pub fn builtin() -> &'static AlarmWhitelist {
        &BUILTIN
    }

    /// Builds a whitelist from list lines.
    pub fn from_entries<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = lines
            .into_iter()
            .flat_map(|line| {
                line.as_ref()
                    .split('/')
                    .map(match_key)
                    .collect::<Vec<_>>()
            })
            .filter(|key| !key.is_empty())
            .collect();
        Self { keys }
    }

    /// Reads a list from any reader.
    pub fn from_reader<R: Read>(reader: R) -> io::Result<Self> {
        let lines = BufReader::new(reader)
            .lines()
            .collect::<io::Result<Vec<String>>>()?;
        Ok(Self::from_entries(lines))
    }

    /// Reads a list file.
    pub fn load(path: &Path) -> io::Result<Self> {
        let whitelist = Self::from_reader(std::fs::File::open(path)?)?;
        tracing::info!(
            path = %path.display(),
            labels = whitelist.len(),
            "loaded technical alarm list"
        );
        Ok(whitelist)
    }

    /// Returns true when the label, once normalized, is on the list.
    pub fn is_whitelisted(&self, label: &str) -> bool {
        let key = match_key(label);
        !key.is_empty() && self.keys.contains(&key)
    }

    /// Returns true when any of the labels is on the list.
    pub fn matches_any<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        labels.iter().any(|label| self.is_whitelisted(label.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
