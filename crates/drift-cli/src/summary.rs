//! Terminal rendering of reports with comfy-table.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use drift_ingest::{PrepareSummary, RawTable};
use drift_model::{AnalyticsReport, FeatureAnalytics, ValidationReport};

pub fn print_report(report: &AnalyticsReport) {
    println!("Split: {} ({})", report.split_label, report.split_strategy);
    println!(
        "Rows: {} total, {} reference, {} comparison",
        report.total_rows, report.reference_count, report.comparison_count
    );
    if let (Some(min), Some(max)) = (&report.date_range.min, &report.date_range.max) {
        println!(
            "Dates: {min} .. {max} ({} distinct days)",
            report.date_range.unique_dates.len()
        );
    }
    println!("{}", report_table(report));
    let drifted = report.drifted_features();
    if drifted.is_empty() {
        println!("No drift detected.");
    } else {
        println!("Drift detected in: {}", drifted.join(", "));
    }
}

/// One row per feature: partition means, mean shift and drift tests.
pub fn report_table(report: &AnalyticsReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Feature"),
        header_cell("Ref mean"),
        header_cell("Cmp mean"),
        header_cell("z_mean"),
        header_cell("KS"),
        header_cell("p-value"),
        header_cell("PSI"),
        header_cell("Drift"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Center);

    for (name, feature) in &report.features {
        table.add_row(feature_row(name, feature));
    }
    table
}

fn feature_row(name: &str, feature: &FeatureAnalytics) -> Vec<Cell> {
    let reference_mean = feature.reference.as_ref().and_then(|stats| stats.mean);
    let comparison = feature.comparison.as_ref();
    let drift = &feature.drift;
    vec![
        Cell::new(name).fg(Color::Blue).add_attribute(Attribute::Bold),
        number_cell(reference_mean, 3),
        number_cell(comparison.and_then(|stats| stats.mean), 3),
        number_cell(comparison.map(|stats| stats.z_mean), 3),
        number_cell(drift.ks_statistic, 4),
        number_cell(drift.ks_pvalue, 4),
        number_cell(drift.psi, 4),
        drift_cell(drift.drifted, drift.ks_statistic.is_some()),
    ]
}

pub fn print_prepare_summary(summary: &PrepareSummary) {
    println!("Output: {}", summary.output_path.display());
    println!(
        "Rows: {} ({}; {} preserved, {} stamped)",
        summary.rows, summary.mode, summary.preserved, summary.stamped
    );
}

pub fn print_validation(report: &ValidationReport, limit: usize) {
    if report.is_valid() {
        println!("All {} records valid.", report.total_records);
        return;
    }
    println!(
        "Validation failed for {}/{} records.",
        report.failed_records(),
        report.total_records
    );
    println!("{}", validation_table(report, limit));
    let hidden = report.missing_columns.len() + report.violations.len();
    if hidden > limit {
        println!("... {} more", hidden - limit);
    }
}

/// Missing columns first, then cell violations, at most `limit` rows.
pub fn validation_table(report: &ValidationReport, limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Row"), header_cell("Column"), header_cell("Problem")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    let missing = report.missing_columns.iter().map(|column| {
        vec![
            dim_cell("-"),
            Cell::new(column),
            Cell::new("column missing").fg(Color::Red),
        ]
    });
    let violations = report.violations.iter().map(|violation| {
        let problem = violation.to_string();
        let problem = problem
            .split_once(": ")
            .map_or(problem.as_str(), |(_, rest)| rest)
            .to_string();
        vec![
            Cell::new(violation.row),
            Cell::new(&violation.column),
            Cell::new(problem).fg(Color::Yellow),
        ]
    });
    for row in missing.chain(violations).take(limit) {
        table.add_row(row);
    }
    table
}

/// Selected rows of a raw table, at most `limit`.
pub fn rows_table(raw: &RawTable, rows: &[usize], limit: usize) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(raw.headers.iter().map(|name| header_cell(name)));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);

    for &row in rows.iter().take(limit) {
        let mut cells = vec![dim_cell(row)];
        cells.extend((0..raw.headers.len()).map(|column| Cell::new(raw.cell(row, column))));
        table.add_row(cells);
    }
    table
}

/// Fixed-precision number, `-` when absent.
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{value:.decimals$}"),
        None => "-".to_string(),
    }
}

fn number_cell(value: Option<f64>, decimals: usize) -> Cell {
    match value {
        Some(_) => Cell::new(format_number(value, decimals)),
        None => dim_cell("-"),
    }
}

fn drift_cell(drifted: bool, tested: bool) -> Cell {
    match (tested, drifted) {
        (false, _) => dim_cell("n/a"),
        (true, true) => Cell::new("DRIFT")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        (true, false) => Cell::new("ok").fg(Color::Green),
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
