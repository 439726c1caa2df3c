//! Feature drift analytics engine.
//!
//! The engine is a pure, per-request computation over an immutable
//! [`drift_model::Dataset`]:
//!
//! 1. [`partition`] selects the working records and splits them into a
//!    reference and a comparison partition.
//! 2. [`stats`] computes descriptive statistics per feature and partition.
//! 3. [`drift`] runs the two-sample KS test and the Population Stability Index.
//! 4. [`summarize`] builds shared-axis histograms and rolling-mean trends.
//!
//! [`engine::analyze`] ties the stages together into one
//! [`drift_model::AnalyticsReport`].

pub mod binning;
pub mod drift;
pub mod engine;
pub mod filter;
pub mod partition;
pub mod stats;
pub mod summarize;

pub use drift::{KsTest, detect_drift, kolmogorov_survival, ks_two_sample, population_stability_index};
pub use engine::analyze;
pub use filter::{CategoryFilter, ColumnFilter, ColumnKind, FilterError};
pub use partition::{
    CutoffSplit, EarliestBatchSplit, Partition, PartitionKind, Partitioner, Partitions,
    PositionalSplit, SplitOutcome, SplitStrategy, partition,
};
pub use stats::{apply_mean_shift, column_statistics, quantile_sorted};
pub use summarize::{histogram, rolling_mean, trend};
