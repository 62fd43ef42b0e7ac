//! Iris measurement record used as model input

use serde::{Deserialize, Serialize};

/// A single Iris flower measurement.
///
/// Every measurement is optional so records can be deserialized from sparse
/// sources; the feature extractor rejects records with missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Iris {
    /// Sepal length in cm
    #[serde(default, alias = "sepalLength")]
    pub sepal_length: Option<f64>,

    /// Sepal width in cm
    #[serde(default, alias = "sepalWidth")]
    pub sepal_width: Option<f64>,

    /// Petal length in cm
    #[serde(default, alias = "petalLength")]
    pub petal_length: Option<f64>,

    /// Petal width in cm
    #[serde(default, alias = "petalWidth")]
    pub petal_width: Option<f64>,

    /// Known species label, if any (not used as a feature)
    #[serde(default, alias = "className")]
    pub class_name: Option<String>,
}

impl Iris {
    /// Create a record with all four measurements set
    pub fn new(sepal_length: f64, sepal_width: f64, petal_length: f64, petal_width: f64) -> Self {
        Self {
            sepal_length: Some(sepal_length),
            sepal_width: Some(sepal_width),
            petal_length: Some(petal_length),
            petal_width: Some(petal_width),
            class_name: None,
        }
    }

    /// Attach a known species label
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}
