use anyhow::{Context, Result};
use chrono::TimeDelta;
use tracing::debug;

use sicu_cli::pipeline::{BatchResult, PipelineConfig, run_batch};
use sicu_cli::validate::{ValidateConfig, ValidationReport, run_validation};
use sicu_ingest::NursingColumns;
use sicu_output::{list_patient_documents, read_patient_document};

use crate::cli::{BuildArgs, InspectArgs, SummaryArgs, ValidateArgs};
use crate::summary::{
    print_admissions, print_alarm_detail, print_alarms, print_document_summaries,
    print_nursing_entries,
};
use crate::types::{AdmissionRow, AlarmDetail, DocumentRow};

pub fn run_build(args: &BuildArgs) -> Result<BatchResult> {
    let config = pipeline_config(args)?;
    run_batch(&config)
}

fn window(minutes: i64) -> Result<TimeDelta> {
    TimeDelta::try_minutes(minutes)
        .with_context(|| format!("window of {minutes} minutes is out of range"))
}

fn pipeline_config(args: &BuildArgs) -> Result<PipelineConfig> {
    let mut columns = NursingColumns::default();
    if let Some(name) = &args.patient_column {
        columns.patient_id = name.clone();
    }
    if let Some(name) = &args.timestamp_column {
        columns.performed_at = name.clone();
    }
    Ok(PipelineConfig {
        nursing_csv: args.nursing_csv.clone(),
        event_log_dir: args.event_log_dir.clone(),
        output_dir: args.output_dir.clone(),
        alarm_list: args.alarm_list.clone(),
        delimiter: if args.tsv { b'\t' } else { b',' },
        columns,
        require_nursing_within: args.require_nursing_within.map(window).transpose()?,
        dry_run: args.dry_run,
    })
}

pub fn run_validate(args: &ValidateArgs) -> Result<ValidationReport> {
    let config = ValidateConfig {
        documents_dir: args.dir.clone(),
        true_alarms: args.true_alarms.clone(),
        window: window(args.window_minutes)?,
        ..ValidateConfig::default()
    };
    run_validation(&config)
}

pub fn run_summary(args: &SummaryArgs) -> Result<()> {
    let documents = list_patient_documents(&args.dir)
        .with_context(|| format!("list documents in {}", args.dir.display()))?;
    debug!(documents = documents.len(), "listed patient documents");

    let rows: Vec<DocumentRow> = documents
        .into_iter()
        .map(|(patient_id, path)| DocumentRow {
            patient_id,
            summary: read_patient_document(&path)
                .map(|document| document.summary())
                .map_err(|error| error.to_string()),
        })
        .collect();
    print_document_summaries(&args.dir, &rows);
    Ok(())
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let document = read_patient_document(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;

    let summary = document.summary();
    println!("Document: {}", args.file.display());
    println!(
        "{} admissions, {} alarms, {} nursing records, {} waveforms",
        summary.admission_periods, summary.alarms, summary.nursing_records, summary.waveforms
    );

    let admissions: Vec<AdmissionRow<'_>> = document
        .admission_periods
        .iter()
        .map(|period| AdmissionRow {
            period,
            dates: document
                .available_dates(&period.id)
                .into_iter()
                .map(|date| (date, document.alarms_for_date(&period.id, date).len()))
                .collect(),
        })
        .collect();
    print_admissions(&admissions);

    let Some(at) = args.at.as_deref().map(str::trim) else {
        return Ok(());
    };
    let entries = document
        .nursing_records_near(at, window(args.window_minutes)?)
        .with_context(|| format!("parse --at {at}"))?;
    print_nursing_entries(at, args.window_minutes, &entries);

    let second = at.split('.').next().unwrap_or(at);
    let date = second.split(' ').next().unwrap_or(second);
    match document
        .admission_periods
        .iter()
        .find(|period| period.contains_date(date))
    {
        Some(period) => println!("{date} falls in {} ({} to {})", period.id, period.start, period.end),
        None => println!("{date} is outside every admission period"),
    }
    let same_day: Vec<_> = document
        .iter_alarms()
        .filter(|(_, alarm)| alarm.timestamp.starts_with(date))
        .map(|(_, alarm)| alarm)
        .collect();
    print_alarms(&same_day);

    for (admission_id, alarm) in document
        .iter_alarms()
        .filter(|(_, alarm)| alarm.timestamp == second)
    {
        print_alarm_detail(&AlarmDetail {
            admission_id,
            alarm,
            bundle: document.waveform_for(alarm),
        });
    }
    Ok(())
}
