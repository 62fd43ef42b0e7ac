//! Feature extraction for Iris classifier inference.
//!
//! Records are turned into ordered feature vectors matching the features the
//! model was trained on. Normalization parameters are computed at training
//! time and handed over as a JSON settings profile; each entry names a feature
//! and the transform fitted for it:
//!
//! ```json
//! [
//!   {"name": "petal_length", "transform": "standard", "params": {"mean": 3.76, "std": 1.76}},
//!   {"name": "sepal_width", "transform": "min_max", "params": {"min": 2.0, "max": 4.4}},
//!   {"name": "petal_width", "transform": "identity"}
//! ]
//! ```
//!
//! Features not listed in the profile are passed through unchanged.

use crate::error::{Result, ServingError};
use crate::models::layout::IRIS_FIELDS;
use crate::types::iris::Iris;
use serde::Deserialize;
use std::collections::HashMap;

/// Turns a typed record into an ordered feature vector.
pub trait FeatureExtractor<T>: Send {
    /// Names of the produced features, in vector order.
    fn feature_names(&self) -> Vec<&str>;

    /// Extract features from one record using the given settings profile.
    fn extract(&self, input: &T, settings: &str) -> Result<Vec<f32>>;

    /// Get the number of features produced.
    fn feature_count(&self) -> usize {
        self.feature_names().len()
    }
}

/// Transform fitted for a single feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "transform", content = "params", rename_all = "snake_case")]
pub enum Transform {
    Identity,
    Standard { mean: f64, std: f64 },
    MinMax { min: f64, max: f64 },
}

impl Transform {
    fn validate(&self, name: &str) -> Result<()> {
        match *self {
            Transform::Standard { std, .. } if std.is_nan() || std <= 0.0 => Err(
                ServingError::extraction(format!(
                    "{}: standard deviation must be positive, got {}",
                    name, std
                )),
            ),
            Transform::MinMax { min, max } if min.is_nan() || max.is_nan() || max <= min => Err(
                ServingError::extraction(format!(
                    "{}: max ({}) must be greater than min ({})",
                    name, max, min
                )),
            ),
            _ => Ok(()),
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Transform::Identity => value,
            Transform::Standard { mean, std } => (value - mean) / std,
            Transform::MinMax { min, max } => (value - min) / (max - min),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FeatureSetting {
    name: String,
    #[serde(flatten)]
    transform: Transform,
}

/// Parsed settings profile: per-feature transforms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSettings {
    transforms: HashMap<String, Transform>,
}

impl FeatureSettings {
    /// Parse a JSON settings profile.
    pub fn parse(settings: &str) -> Result<Self> {
        let entries: Vec<FeatureSetting> = serde_json::from_str(settings)
            .map_err(|e| ServingError::extraction(format!("invalid settings: {}", e)))?;

        let mut transforms = HashMap::with_capacity(entries.len());
        for entry in entries {
            entry.transform.validate(&entry.name)?;
            if transforms.insert(entry.name.clone(), entry.transform).is_some() {
                return Err(ServingError::extraction(format!(
                    "feature {} configured more than once",
                    entry.name
                )));
            }
        }

        Ok(Self { transforms })
    }

    pub fn get(&self, name: &str) -> Option<&Transform> {
        self.transforms.get(name)
    }

    fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.transforms.keys().map(String::as_str)
    }
}

/// Feature spec of the Iris classifier.
///
/// All four measurements are required; features are emitted in the order of
/// [`IRIS_FIELDS`].
pub struct IrisFeatureSpec;

impl IrisFeatureSpec {
    /// Create a new feature spec.
    pub fn new() -> Self {
        Self
    }

    fn raw_values(input: &Iris) -> [(&'static str, Option<f64>); 4] {
        [
            ("petal_length", input.petal_length),
            ("petal_width", input.petal_width),
            ("sepal_length", input.sepal_length),
            ("sepal_width", input.sepal_width),
        ]
    }

    /// Extract features with an already parsed profile.
    pub fn extract_with(&self, input: &Iris, settings: &FeatureSettings) -> Result<Vec<f32>> {
        if let Some(unknown) = settings
            .feature_names()
            .find(|name| !IRIS_FIELDS.contains(name))
        {
            return Err(ServingError::extraction(format!(
                "settings reference unknown feature {}",
                unknown
            )));
        }

        Self::raw_values(input)
            .into_iter()
            .map(|(name, value)| {
                let value = value.ok_or_else(|| {
                    ServingError::extraction(format!("required feature {} is missing", name))
                })?;
                let value = match settings.get(name) {
                    Some(transform) => transform.apply(value),
                    None => value,
                };
                Ok(value as f32)
            })
            .collect()
    }
}

impl FeatureExtractor<Iris> for IrisFeatureSpec {
    fn feature_names(&self) -> Vec<&str> {
        IRIS_FIELDS.to_vec()
    }

    fn extract(&self, input: &Iris, settings: &str) -> Result<Vec<f32>> {
        let settings = FeatureSettings::parse(settings)?;
        self.extract_with(input, &settings)
    }
}

impl Default for IrisFeatureSpec {
    fn default() -> Self {
        Self::new()
    }
}
