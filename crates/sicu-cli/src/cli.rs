//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sicu_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "sicu-etl",
    version,
    about = "Build per-patient SICU alarm review documents",
    long_about = "Join the EMR nursing export with bedside monitor event logs.\n\n\
                  Writes one JSON document per patient holding admission periods,\n\
                  technical alarms, nursing records and alarm waveforms."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow nursing text and alarm labels in trace output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build patient documents from the nursing export and event logs.
    Build(BuildArgs),

    /// Summarize every patient document in a directory.
    Summary(SummaryArgs),

    /// Show one patient document around an instant.
    Inspect(InspectArgs),

    /// Judge every alarm true or false against a true-alarm nursing list.
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Nursing record export (CSV).
    #[arg(long = "nursing-csv", value_name = "PATH", default_value = "data/nursing_records.csv")]
    pub nursing_csv: PathBuf,

    /// Directory of `{patient_id}.json` monitor event logs.
    #[arg(long = "event-logs", value_name = "DIR", default_value = "data/event_logs")]
    pub event_log_dir: PathBuf,

    /// Directory receiving `{patient_id}.json` documents.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "DATA")]
    pub output_dir: PathBuf,

    /// Technical alarm list replacing the built-in one.
    ///
    /// One label per line; a line containing `/` lists several labels.
    #[arg(long = "alarm-list", value_name = "PATH")]
    pub alarm_list: Option<PathBuf>,

    /// Read the nursing export as tab-separated.
    #[arg(long = "tsv")]
    pub tsv: bool,

    /// Header of the patient identifier column.
    #[arg(long = "patient-column", value_name = "NAME")]
    pub patient_column: Option<String>,

    /// Header of the execution timestamp column.
    #[arg(long = "timestamp-column", value_name = "NAME")]
    pub timestamp_column: Option<String>,

    /// Keep only alarms with a nursing record within N minutes.
    #[arg(long = "require-nursing-within", value_name = "MINUTES")]
    pub require_nursing_within: Option<i64>,

    /// Build and report without writing documents.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct SummaryArgs {
    /// Directory of patient documents.
    #[arg(value_name = "DIR", default_value = "DATA")]
    pub dir: PathBuf,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Patient document to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Instant to look around (`YYYY-MM-DD HH:MM:SS`).
    #[arg(long = "at", value_name = "TIMESTAMP")]
    pub at: Option<String>,

    /// Half-width of the nursing record window, in minutes.
    #[arg(long = "window-minutes", value_name = "N", default_value_t = sicu_model::DEFAULT_NURSING_WINDOW_MINUTES)]
    pub window_minutes: i64,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Directory of patient documents.
    #[arg(value_name = "DIR", default_value = "DATA")]
    pub dir: PathBuf,

    /// Tab-separated nursing actions that confirm an alarm.
    #[arg(
        long = "true-alarms",
        value_name = "PATH",
        default_value = "data/nr_alarm_true_list.tsv"
    )]
    pub true_alarms: PathBuf,

    /// Half-width of the nursing record window, in minutes.
    #[arg(long = "window-minutes", value_name = "N", default_value_t = sicu_model::DEFAULT_NURSING_WINDOW_MINUTES)]
    pub window_minutes: i64,

    /// List every alarm, not only the per-patient totals.
    #[arg(long = "alarms")]
    pub alarms: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
