//! Test doubles for the model runtime.
//!
//! [`IrisRuleRuntime`] behaves like a served Iris export: it parses the
//! serialized examples, rejects batches with missing features and classifies
//! with a fixed decision rule, so adapter behaviour can be checked without
//! native libraries.

use crate::error::{Result, ServingError};
use crate::models::layout::IRIS_FIELDS;
use crate::models::runtime::{LoadedModel, ModelRuntime, INPUT_BINDING, OUTPUT_BINDING};
use crate::types::example::Example;
use crate::types::record::FeatureRecord;
use prost::Message;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Temporary directory laid out like a saved model export
pub fn saved_model_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("saved_model.pb"), b"\x0a\x00").unwrap();
    std::fs::create_dir(dir.path().join("variables")).unwrap();
    dir
}

#[derive(Default)]
struct Counters {
    loads: AtomicUsize,
    runs: AtomicUsize,
    closes: AtomicUsize,
}

/// Runtime classifying Iris records with a decision stump on petal size
#[derive(Default)]
pub struct IrisRuleRuntime {
    counters: Arc<Counters>,
    load_failure: Option<String>,
}

impl IrisRuleRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_load(reason: &str) -> Self {
        Self {
            load_failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn loads(&self) -> usize {
        self.counters.loads.load(Ordering::SeqCst)
    }

    pub fn runs(&self) -> usize {
        self.counters.runs.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }
}

impl ModelRuntime for IrisRuleRuntime {
    fn name(&self) -> &str {
        "iris-rule"
    }

    fn load_model(&self, _export_dir: &Path, tags: &[String]) -> Result<Box<dyn LoadedModel>> {
        if let Some(reason) = &self.load_failure {
            return Err(ServingError::execution(reason));
        }
        if !tags.iter().any(|t| t == "serve") {
            return Err(ServingError::execution(format!(
                "no meta graph tagged {:?}",
                tags
            )));
        }
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(IrisRuleModel {
            counters: self.counters.clone(),
        }))
    }
}

struct IrisRuleModel {
    counters: Arc<Counters>,
}

impl IrisRuleModel {
    fn classify(record: &FeatureRecord) -> Result<i64> {
        let mut values = [0f32; 4];
        for (slot, name) in values.iter_mut().zip(IRIS_FIELDS) {
            match record.get(name) {
                Some([value]) => *slot = *value,
                Some(other) => {
                    return Err(ServingError::execution(format!(
                        "Key: {}. Can't parse serialized Example: expected 1 value, got {}",
                        name,
                        other.len()
                    )))
                }
                None => {
                    return Err(ServingError::execution(format!(
                        "Feature: {} (data type: float) is required but could not be found.",
                        name
                    )))
                }
            }
        }

        let [petal_length, petal_width, _, _] = values;
        Ok(if petal_length < 2.45 {
            0
        } else if petal_width < 1.75 {
            1
        } else {
            2
        })
    }
}

impl LoadedModel for IrisRuleModel {
    fn run_inference(&self, input: &str, batch: &[Vec<u8>], output: &str) -> Result<Vec<i64>> {
        if input != INPUT_BINDING {
            return Err(ServingError::execution(format!(
                "no operation named {} in graph",
                input
            )));
        }
        if output != OUTPUT_BINDING {
            return Err(ServingError::execution(format!(
                "no operation named {} in graph",
                output
            )));
        }

        self.counters.runs.fetch_add(1, Ordering::SeqCst);

        batch
            .iter()
            .map(|bytes| {
                let example = Example::decode(bytes.as_slice())
                    .map_err(|e| ServingError::execution(format!("Could not parse example: {}", e)))?;
                Self::classify(&FeatureRecord::from_example(&example))
            })
            .collect()
    }

    fn close(&mut self) -> Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
