//! Model Serving Adapter Library
//!
//! Loads an exported Iris classifier, turns typed measurement records into
//! serialized `tensorflow.Example` features and runs a single inference call
//! to obtain a class id.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod models;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::AppConfig;
pub use error::{Result, ServingError};
pub use feature_extractor::{FeatureExtractor, FeatureSettings, IrisFeatureSpec};
pub use models::inference::{InferenceEngine, ModelState};
pub use models::layout::FeatureLayout;
pub use types::{iris::Iris, record::FeatureRecord};
