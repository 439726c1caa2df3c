//! Analytics options from an optional JSON file plus flag overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use drift_model::AnalyticsOptions;

/// Load options from `path`, or defaults when no file is given.
///
/// Fields missing from the file keep their defaults.
pub fn load_options(path: Option<&Path>) -> Result<AnalyticsOptions> {
    let Some(path) = path else {
        return Ok(AnalyticsOptions::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let options: AnalyticsOptions =
        serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        features = options.feature_columns.len(),
        "loaded analytics options"
    );
    Ok(options)
}

/// Apply `--feature` flags; an empty list keeps the configured columns.
pub fn apply_feature_overrides(options: AnalyticsOptions, features: &[String]) -> AnalyticsOptions {
    if features.is_empty() {
        options
    } else {
        options.with_feature_columns(features.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let options = load_options(None).unwrap();
        assert_eq!(options, AnalyticsOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"feature_columns": ["Glucose"], "significance_level": 0.01}}"#).unwrap();
        let options = load_options(Some(file.path())).unwrap();
        assert_eq!(options.feature_columns, vec!["Glucose"]);
        assert_eq!(options.significance_level, 0.01);
        assert_eq!(options.histogram_bins, 20);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_options(Some(file.path())).unwrap_err();
        assert!(err.to_string().starts_with("parse config"));
    }

    #[test]
    fn test_feature_overrides() {
        let options = apply_feature_overrides(AnalyticsOptions::default(), &["BMI".to_string()]);
        assert_eq!(options.feature_columns, vec!["BMI"]);
        let options = apply_feature_overrides(options, &[]);
        assert_eq!(options.feature_columns, vec!["BMI"]);
    }
}
