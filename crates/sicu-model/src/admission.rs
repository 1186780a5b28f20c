use serde::{Deserialize, Serialize};

/// One hospital stay inferred from a `DatSeq` group of the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionPeriod {
    /// Date of the earliest timestamp in the group (`YYYY-MM-DD`).
    pub start: String,
    /// Date of the latest timestamp in the group.
    pub end: String,
    /// Sequential label, `admission1` for the lowest group index.
    pub id: String,
}

impl AdmissionPeriod {
    /// Builds the label used for the `ordinal`-th period (1-based).
    pub fn label(ordinal: usize) -> String {
        format!("admission{ordinal}")
    }

    /// Returns true when `date` falls inside the period (inclusive).
    pub fn contains_date(&self, date: &str) -> bool {
        self.start.as_str() <= date && date <= self.end.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_date_is_inclusive() {
        let period = AdmissionPeriod {
            start: "2024-09-01".to_string(),
            end: "2024-09-03".to_string(),
            id: AdmissionPeriod::label(1),
        };
        assert_eq!(period.id, "admission1");
        assert!(period.contains_date("2024-09-01"));
        assert!(period.contains_date("2024-09-03"));
        assert!(!period.contains_date("2024-08-31"));
        assert!(!period.contains_date("2024-09-04"));
    }
}
