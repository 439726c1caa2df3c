//! Feature value ranges used to validate snapshot records.

use serde::{Deserialize, Serialize};

/// Allowed range for one feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub min: f64,
    pub max: f64,
    /// Whether values must be whole numbers.
    pub integer: bool,
    pub description: Option<String>,
}

impl FeatureSpec {
    pub fn float(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            integer: false,
            description: None,
        }
    }

    pub fn integer(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            integer: true,
            ..Self::float(name, min, max)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Inclusive range check.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Ordered collection of feature specs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    pub fn new(features: Vec<FeatureSpec>) -> Self {
        Self { features }
    }

    /// Ranges for the patient snapshot columns.
    pub fn patient_default() -> Self {
        Self::new(vec![
            FeatureSpec::integer("Pregnancies", 0.0, 20.0)
                .with_description("Number of pregnancies"),
            FeatureSpec::float("Glucose", 0.0, 250.0)
                .with_description("Plasma glucose concentration (mg/dL)"),
            FeatureSpec::float("BloodPressure", 0.0, 200.0)
                .with_description("Diastolic blood pressure (mmHg)"),
            FeatureSpec::float("SkinThickness", 0.0, 120.0)
                .with_description("Triceps skin fold thickness (mm)"),
            FeatureSpec::float("Insulin", 0.0, 900.0)
                .with_description("2-Hour serum insulin (mu U/ml)"),
            FeatureSpec::float("BMI", 0.0, 80.0).with_description("Body mass index (kg/m²)"),
            FeatureSpec::float("DiabetesPedigreeFunction", 0.0, 3.0)
                .with_description("Diabetes pedigree function score"),
            FeatureSpec::integer("Age", 18.0, 100.0).with_description("Patient age in years"),
            FeatureSpec::integer("Outcome", 0.0, 1.0)
                .with_description("Diabetes diagnosis (0=No, 1=Yes)"),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.features.iter().find(|feature| feature.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|feature| feature.name.as_str())
    }
}
