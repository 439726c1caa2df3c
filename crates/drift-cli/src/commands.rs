use std::fs;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use drift_core::analyze;
use drift_ingest::{
    PrepareConfig, PrepareSummary, build_column_hints, load_snapshot, prepare_snapshot,
    read_raw_table, validate_raw,
};
use drift_model::{AnalyticsReport, AnalyticsRequest, FeatureSchema, ValidationReport, parse_timestamp};
use tracing::{info, info_span};

use drift_cli::config::{apply_feature_overrides, load_options};
use drift_cli::inspect::{bind_filters, matching_rows};
use drift_cli::summary::{print_report, rows_table};

use crate::cli::{AnalyzeArgs, InspectArgs, PrepareArgs, ReportFormatArg, ValidateArgs};

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyticsReport> {
    let span = info_span!("analyze_command", snapshot = %args.snapshot.display());
    let _guard = span.enter();
    let start = Instant::now();

    let options = apply_feature_overrides(load_options(args.config.as_deref())?, &args.features);
    let dataset = load_snapshot(&args.snapshot, &options)
        .with_context(|| format!("load snapshot {}", args.snapshot.display()))?;

    let mut request = AnalyticsRequest::new();
    if let Some(category) = &args.category {
        request = request.with_category(category.as_str());
    }
    if let Some(cutoff) = &args.cutoff {
        request = request.with_cutoff(cutoff.as_str());
    }
    let report = analyze(&dataset, &request, &options).context("compute analytics")?;

    let json = serde_json::to_string_pretty(&report).context("serialize report")?;
    if let Some(path) = &args.output {
        fs::write(path, &json).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
    }
    match args.format {
        ReportFormatArg::Json if args.output.is_none() => println!("{json}"),
        ReportFormatArg::Json => {}
        ReportFormatArg::Table => print_report(&report),
    }
    info!(
        duration_ms = start.elapsed().as_millis(),
        features = report.features.len(),
        "analyze command complete"
    );
    Ok(report)
}

pub fn run_prepare(args: &PrepareArgs) -> Result<PrepareSummary> {
    let timestamp = match &args.timestamp {
        Some(raw) => parse_timestamp(raw).ok_or_else(|| anyhow!("invalid timestamp '{raw}'"))?,
        None => Utc::now().naive_utc(),
    };
    let config = PrepareConfig::new(&args.raw, &args.output, timestamp);
    prepare_snapshot(&config).with_context(|| format!("prepare {}", args.raw.display()))
}

pub fn run_validate(args: &ValidateArgs) -> Result<ValidationReport> {
    validate_raw(&args.path, &FeatureSchema::patient_default())
        .with_context(|| format!("validate {}", args.path.display()))
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let table = read_raw_table(&args.path).with_context(|| format!("read {}", args.path.display()))?;
    let hints = build_column_hints(&table);
    let filters = bind_filters(&table, &hints, &args.filters)?;
    let rows = matching_rows(&table, &filters);
    info!(
        total = table.rows.len(),
        matched = rows.len(),
        filters = filters.len(),
        "inspect"
    );
    println!("{}", rows_table(&table, &rows, args.limit));
    println!("{} of {} rows match", rows.len(), table.rows.len());
    Ok(())
}
