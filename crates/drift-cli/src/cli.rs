//! CLI argument definitions for drift-studio.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "drift-studio",
    version,
    about = "Feature drift analytics for tabular snapshots",
    long_about = "Compare a reference window of feature records against a comparison window.\n\n\
                  Reports descriptive statistics, a two-sample Kolmogorov-Smirnov test,\n\
                  the Population Stability Index, shared-axis histograms and rolling-mean trends."
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

    /// Allow row-level values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run drift analytics on a prepared snapshot.
    Analyze(AnalyzeArgs),

    /// Validate a raw CSV, add identifiers and timestamps, and write Parquet.
    Prepare(PrepareArgs),

    /// Check a raw CSV against the patient feature ranges.
    Validate(ValidateArgs),

    /// Show raw CSV rows matching column filters.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Snapshot file (.parquet or .csv).
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Keep only records whose label equals this integer ("all" keeps everything).
    #[arg(long = "category")]
    pub category: Option<String>,

    /// Reference window ends at the end of this day (YYYY-MM-DD).
    #[arg(long = "cutoff", value_name = "DATE")]
    pub cutoff: Option<String>,

    /// Feature column to analyze (repeatable; default: configured columns).
    #[arg(long = "feature", value_name = "NAME")]
    pub features: Vec<String>,

    /// JSON file with analytics options.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,

    /// Write the JSON report to a file.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct PrepareArgs {
    /// Raw CSV with one row per patient.
    #[arg(value_name = "RAW_CSV")]
    pub raw: PathBuf,

    /// Parquet snapshot to write.
    #[arg(long = "output", value_name = "PARQUET")]
    pub output: PathBuf,

    /// Timestamp for newly stamped rows (default: now, UTC).
    #[arg(long = "timestamp", value_name = "RFC3339")]
    pub timestamp: Option<String>,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Raw CSV or Parquet file.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Maximum problems to list.
    #[arg(long = "limit", default_value_t = 20)]
    pub limit: usize,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// CSV file to inspect.
    #[arg(value_name = "CSV")]
    pub path: PathBuf,

    /// Column filter as COLUMN=EXPR (numeric: lo:hi, lo:, :hi or a value; text: substring).
    #[arg(long = "filter", value_name = "COLUMN=EXPR")]
    pub filters: Vec<String>,

    /// Maximum rows to print.
    #[arg(long = "limit", default_value_t = 20)]
    pub limit: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
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
