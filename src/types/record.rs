//! Named-field feature record and its wire encoding

use crate::error::Result;
use crate::types::example::{Example, Feature, Features};
use prost::Message;
use std::collections::BTreeMap;

/// Record of named features, each holding a float list.
///
/// This is what the exported model parses out of its input tensor; the field
/// names must match the names the model was trained with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    fields: BTreeMap<String, Vec<f32>>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single-value feature, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: f32) {
        self.fields.insert(name.into(), vec![value]);
    }

    /// Remove a feature, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<f32>> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in encoding order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Convert to the `tensorflow.Example` message.
    pub fn to_example(&self) -> Example {
        let feature = self
            .fields
            .iter()
            .map(|(name, values)| (name.clone(), Feature::floats(values.clone())))
            .collect();

        Example {
            features: Some(Features { feature }),
        }
    }

    /// Serialize to the canonical `tensorflow.Example` bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let example = self.to_example();
        let mut buf = Vec::with_capacity(example.encoded_len());
        example.encode(&mut buf)?;
        Ok(buf)
    }

    /// Rebuild a record from an `Example`, keeping only float-list features.
    pub fn from_example(example: &Example) -> Self {
        let fields = example
            .features
            .iter()
            .flat_map(|f| f.feature.iter())
            .filter_map(|(name, feature)| {
                feature
                    .as_floats()
                    .map(|values| (name.clone(), values.to_vec()))
            })
            .collect();

        Self { fields }
    }
}
