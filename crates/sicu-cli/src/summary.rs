use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use sicu_cli::pipeline::BatchResult;
use sicu_cli::validate::ValidationReport;
use sicu_model::{AlarmEvent, DocumentSummary, NursingEntry, SeverityColor, WaveChannel};

use crate::types::{AdmissionRow, AlarmDetail, DocumentRow};

pub fn print_batch_summary(result: &BatchResult) {
    if result.dry_run {
        println!("Dry run: nothing written");
    } else {
        println!("Output: {}", result.output_dir.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patient"),
        header_cell("Status"),
        header_cell("Admissions"),
        header_cell("Alarms"),
        header_cell("Nursing"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 1, CellAlignment::Left);

    let mut rows: Vec<(i64, Vec<Cell>)> = Vec::new();
    for outcome in &result.written {
        let status = if outcome.path.is_some() { "written" } else { "built" };
        rows.push((
            outcome.patient_id,
            vec![
                Cell::new(outcome.patient_id),
                Cell::new(status).fg(Color::Green),
                Cell::new(outcome.summary.admission_periods),
                Cell::new(outcome.summary.alarms),
                Cell::new(outcome.summary.nursing_records),
                dim_cell(
                    outcome
                        .path
                        .as_deref()
                        .map(|path| path.display().to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ],
        ));
    }
    for failure in &result.failures {
        rows.push((
            failure.patient_id,
            vec![
                Cell::new(failure.patient_id),
                Cell::new(failure.kind)
                    .fg(Color::Red)
                    .add_attribute(Attribute::Bold),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(&failure.message),
            ],
        ));
    }
    for (patient_id, reason) in &result.skipped {
        rows.push((
            *patient_id,
            vec![
                Cell::new(patient_id),
                Cell::new("skipped").fg(Color::Yellow),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell(reason.as_str()),
            ],
        ));
    }
    rows.sort_by_key(|(patient_id, _)| *patient_id);
    for (_, row) in rows {
        table.add_row(row);
    }
    println!("{table}");
    println!(
        "{} built, {} failed, {} skipped",
        result.written.len(),
        result.failures.len(),
        result.skipped.len()
    );
}

pub fn print_document_summaries(dir: &Path, rows: &[DocumentRow]) {
    println!("Documents: {}", dir.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patient"),
        header_cell("Admissions"),
        header_cell("Alarms"),
        header_cell("Nursing"),
        header_cell("Waveforms"),
    ]);
    apply_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total = DocumentSummary::default();
    for row in rows {
        match &row.summary {
            Ok(summary) => {
                total.admission_periods += summary.admission_periods;
                total.alarms += summary.alarms;
                total.nursing_records += summary.nursing_records;
                total.waveforms += summary.waveforms;
                table.add_row(vec![
                    Cell::new(row.patient_id),
                    Cell::new(summary.admission_periods),
                    Cell::new(summary.alarms),
                    Cell::new(summary.nursing_records),
                    Cell::new(summary.waveforms),
                ]);
            }
            Err(message) => {
                table.add_row(vec![
                    Cell::new(row.patient_id),
                    Cell::new(message).fg(Color::Red),
                    dim_cell("-"),
                    dim_cell("-"),
                    dim_cell("-"),
                ]);
            }
        }
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total.admission_periods).add_attribute(Attribute::Bold),
        Cell::new(total.alarms).add_attribute(Attribute::Bold),
        Cell::new(total.nursing_records).add_attribute(Attribute::Bold),
        Cell::new(total.waveforms).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

/// Admissions with their alarm count per date.
pub fn print_admissions(rows: &[AdmissionRow<'_>]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Admission"),
        header_cell("Start"),
        header_cell("End"),
        header_cell("Date"),
        header_cell("Alarms"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for row in rows {
        let AdmissionRow { period, dates } = row;
        let (id, start, end) = (&period.id, &period.start, &period.end);
        if dates.is_empty() {
            table.add_row(vec![
                Cell::new(id),
                Cell::new(start),
                Cell::new(end),
                dim_cell("-"),
                dim_cell(0),
            ]);
        }
        for (date, count) in dates {
            table.add_row(vec![
                Cell::new(id),
                Cell::new(start),
                Cell::new(end),
                Cell::new(date),
                Cell::new(count),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_nursing_entries(at: &str, window_minutes: i64, entries: &[&NursingEntry]) {
    println!("Nursing records within {window_minutes} min of {at}: {}", entries.len());
    if entries.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Performed"),
        header_cell("Intervention"),
        header_cell("Activity"),
        header_cell("Attribute"),
        header_cell("Value"),
        header_cell("Duty"),
    ]);
    apply_table_style(&mut table);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.performed_at),
            optional_cell(entry.intervention.as_deref()),
            optional_cell(entry.activity.as_deref()),
            optional_cell(entry.attribute_code.as_deref()),
            optional_cell(entry.attribute_value.as_deref()),
            optional_cell(entry.duty.as_deref()),
        ]);
    }
    println!("{table}");
}

pub fn print_alarm_detail(detail: &AlarmDetail<'_>) {
    let AlarmDetail {
        admission_id,
        alarm,
        bundle,
    } = detail;
    println!(
        "Alarm {} ({admission_id}) at {}",
        alarm.id, alarm.waveform_key
    );
    let Some(bundle) = bundle else {
        println!("No waveform bundle for {}", alarm.waveform_key);
        return;
    };
    println!("Label: {}", bundle.alarm_label);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Channel"), header_cell("Samples")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for channel in WaveChannel::ALL {
        let samples = match bundle.samples(channel) {
            Ok(samples) => Cell::new(samples.len()),
            Err(error) => Cell::new(error).fg(Color::Red),
        };
        table.add_row(vec![Cell::new(channel.bundle_key()), samples]);
    }
    println!("{table}");

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Numeric"),
        header_cell("Value"),
        header_cell("Offset (s)"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (label, reading) in &bundle.numeric {
        table.add_row(vec![
            Cell::new(label),
            Cell::new(reading.value()),
            reading
                .time_diff_sec()
                .map_or_else(|| dim_cell("-"), |offset| Cell::new(format!("{offset:.3}"))),
        ]);
    }
    println!("{table}");
}

pub fn print_validation(report: &ValidationReport, list_alarms: bool) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patient"),
        header_cell("Alarms"),
        header_cell("True"),
        header_cell("False"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut rows: Vec<(i64, Vec<Cell>)> = Vec::new();
    for patient in &report.patients {
        let true_alarms = patient.true_alarms();
        rows.push((
            patient.patient_id,
            vec![
                Cell::new(patient.patient_id),
                Cell::new(patient.verdicts.len()),
                Cell::new(true_alarms).fg(Color::Green),
                Cell::new(patient.verdicts.len() - true_alarms),
                dim_cell("-"),
            ],
        ));
    }
    for failure in &report.failures {
        rows.push((
            failure.patient_id,
            vec![
                Cell::new(failure.patient_id),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                Cell::new(format!("{}: {}", failure.kind, failure.message)).fg(Color::Red),
            ],
        ));
    }
    rows.sort_by_key(|(patient_id, _)| *patient_id);
    for (_, row) in rows {
        table.add_row(row);
    }
    println!("{table}");

    if list_alarms {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Alarm"),
            header_cell("Admission"),
            header_cell("Severity"),
            header_cell("Nursing"),
            header_cell("Verdict"),
            header_cell("Matched"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 3, CellAlignment::Right);
        for verdict in report.patients.iter().flat_map(|patient| &patient.verdicts) {
            let judged = if verdict.is_true() {
                Cell::new("true").fg(Color::Green)
            } else {
                Cell::new("false").fg(Color::DarkGrey)
            };
            table.add_row(vec![
                Cell::new(&verdict.alarm_id),
                Cell::new(&verdict.admission_id),
                Cell::new(verdict.color).fg(severity_color(verdict.color)),
                Cell::new(verdict.nursing_records),
                judged,
                optional_cell(verdict.matched_at.as_deref()),
            ]);
        }
        println!("{table}");
    }

    let alarms = report.alarms();
    let true_alarms = report.true_alarms();
    println!(
        "{alarms} alarms judged: {true_alarms} true, {} false, {} patients failed",
        alarms - true_alarms,
        report.failures.len()
    );
}

fn severity_color(color: SeverityColor) -> Color {
    match color {
        SeverityColor::Red => Color::Red,
        SeverityColor::Yellow | SeverityColor::ShortYellow => Color::Yellow,
        SeverityColor::SevereCyan | SeverityColor::Cyan | SeverityColor::SilentCyan => Color::Cyan,
        SeverityColor::White => Color::White,
    }
}

fn severity_cell(alarm: &AlarmEvent) -> Cell {
    Cell::new(alarm.color).fg(severity_color(alarm.color))
}

pub fn print_alarms(alarms: &[&AlarmEvent]) {
    if alarms.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Time"),
        header_cell("Severity"),
        header_cell("Display"),
        header_cell("Alarm"),
    ]);
    apply_table_style(&mut table);
    for alarm in alarms {
        table.add_row(vec![
            Cell::new(&alarm.time),
            severity_cell(alarm),
            dim_cell(alarm.color.hex()),
            Cell::new(&alarm.id),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<&str>) -> Cell {
    value.map_or_else(|| dim_cell("-"), Cell::new)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
