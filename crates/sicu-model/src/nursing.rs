use serde::{Deserialize, Serialize};

/// One nursing action as exported by the hospital EMR.
///
/// Field names on the wire are the export's own column headers so the
/// review viewer can read documents without a mapping step. Cells that are
/// empty in the export serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NursingEntry {
    #[serde(rename = "시행일시")]
    pub performed_at: String,
    #[serde(rename = "간호중재(코드명)")]
    pub intervention: Option<String>,
    #[serde(rename = "간호활동(코드명)")]
    pub activity: Option<String>,
    #[serde(rename = "간호속성코드(코드명)")]
    pub attribute_code: Option<String>,
    #[serde(rename = "속성")]
    pub attribute_value: Option<String>,
    #[serde(rename = "Duty(코드명)")]
    pub duty: Option<String>,
    #[serde(rename = "간호진단프로토콜(코드명)")]
    pub protocol: Option<String>,
}
