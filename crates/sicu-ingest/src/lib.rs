//! Source data ingestion for the alarm review pipeline.
//!
//! Two inputs feed every patient document:
//!
//! - **Nursing CSV**: one row per nursing action, exported from the EMR with
//!   Korean column headers. Loaded once per run into a [`NursingTable`].
//! - **Event logs**: one `{patient_id}.json` per patient, produced by the
//!   bedside monitor export, nested as `DatSeq -> sequence -> timestamp ->
//!   [detail record]`. Loaded on demand into an [`EventLog`].
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use sicu_ingest::{NursingColumns, list_event_logs, load_event_log_at, read_nursing_table};
//!
//! let table = read_nursing_table(Path::new("data/nursing_records.csv"), &NursingColumns::default(), b',')?;
//! let logs = list_event_logs(Path::new("data/event_logs"))?;
//! for patient_id in table.patient_ids().intersection(&logs.keys().copied().collect()) {
//!     let log = load_event_log_at(&logs[patient_id], *patient_id)?;
//! }
//! ```

mod discovery;
mod error;
mod event_log;
mod nursing;
mod true_alarms;

// === Error Types ===
pub use error::{IngestError, Result};

// === Nursing CSV ===
pub use nursing::{NursingColumns, NursingRow, NursingTable, read_nursing_table};

// === True-Alarm List ===
pub use true_alarms::{TrueAlarmRecord, read_true_alarm_list};

// === Event Logs ===
pub use discovery::list_event_logs;
pub use event_log::{EventLog, SequenceGroup, event_log_path, load_event_log, load_event_log_at};
