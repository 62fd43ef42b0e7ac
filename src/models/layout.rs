//! Feature layout: which vector index becomes which named model input.
//!
//! The extractor emits an ordered vector; the exported model reads named
//! features. The mapping between the two is declared here as a table so it can
//! be checked against the extractor's declared output order instead of being
//! buried in record construction.

use crate::error::{Result, ServingError};
use crate::types::record::FeatureRecord;

/// Field names of the Iris model, in feature-vector order.
pub const IRIS_FIELDS: [&str; 4] = ["petal_length", "petal_width", "sepal_length", "sepal_width"];

/// Ordered `(index, field name)` table.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayout {
    entries: Vec<(usize, String)>,
}

impl FeatureLayout {
    /// Build a layout from explicit `(index, name)` pairs.
    ///
    /// Indices must cover `0..n` exactly once and names must be unique and
    /// non-empty.
    pub fn new(entries: Vec<(usize, String)>) -> Result<Self> {
        if entries.is_empty() {
            return Err(ServingError::InvalidLayout("layout has no fields".into()));
        }

        let mut seen_index = vec![false; entries.len()];
        let mut names: Vec<&str> = Vec::with_capacity(entries.len());

        for (index, name) in &entries {
            if name.is_empty() {
                return Err(ServingError::InvalidLayout(format!(
                    "empty field name at index {}",
                    index
                )));
            }
            match seen_index.get_mut(*index) {
                Some(seen) if !*seen => *seen = true,
                Some(_) => {
                    return Err(ServingError::InvalidLayout(format!(
                        "index {} mapped more than once",
                        index
                    )))
                }
                None => {
                    return Err(ServingError::InvalidLayout(format!(
                        "index {} out of range for {} fields",
                        index,
                        entries.len()
                    )))
                }
            }
            if names.contains(&name.as_str()) {
                return Err(ServingError::InvalidLayout(format!(
                    "field {} mapped more than once",
                    name
                )));
            }
            names.push(name.as_str());
        }

        let mut entries = entries;
        entries.sort_by_key(|(index, _)| *index);
        Ok(Self { entries })
    }

    /// Build a layout where the i-th name takes the i-th vector value.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .enumerate()
                .map(|(index, name)| (index, name.into()))
                .collect(),
        )
    }

    /// Layout of the Iris classifier export.
    pub fn iris() -> Self {
        Self {
            entries: IRIS_FIELDS
                .iter()
                .enumerate()
                .map(|(index, name)| (index, name.to_string()))
                .collect(),
        }
    }

    /// Number of fields, which is also the required vector length.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(usize, String)] {
        &self.entries
    }

    /// Field names in vector order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(_, name)| name.as_str()).collect()
    }

    /// Pack an ordered feature vector into a named-field record.
    pub fn pack(&self, features: &[f32]) -> Result<FeatureRecord> {
        if features.len() != self.entries.len() {
            return Err(ServingError::FeatureArity {
                expected: self.entries.len(),
                actual: features.len(),
            });
        }

        let mut record = FeatureRecord::new();
        for (index, name) in &self.entries {
            record.insert(name.clone(), features[*index]);
        }
        Ok(record)
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::iris()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iris_pack() {
        let layout = FeatureLayout::iris();
        let record = layout.pack(&[1.4, 0.2, 5.1, 3.5]).unwrap();

        assert_eq!(record.len(), 4);
        assert_eq!(record.get("petal_length"), Some(&[1.4f32][..]));
        assert_eq!(record.get("petal_width"), Some(&[0.2f32][..]));
        assert_eq!(record.get("sepal_length"), Some(&[5.1f32][..]));
        assert_eq!(record.get("sepal_width"), Some(&[3.5f32][..]));
    }

    #[test]
    fn test_every_field_holds_one_value() {
        let layout = FeatureLayout::iris();
        let vectors = [[0.0f32; 4], [-1.0, 2.5, 1e6, f32::MIN_POSITIVE], [7.7, 3.0, 6.7, 2.2]];

        for vector in &vectors {
            let record = layout.pack(vector).unwrap();
            assert_eq!(record.len(), 4);
            for (index, name) in layout.entries() {
                assert_eq!(record.get(name), Some(&[vector[*index]][..]));
            }
        }
    }

    #[test]
    fn test_pack_rejects_wrong_length() {
        let layout = FeatureLayout::iris();

        for len in [0usize, 3, 5] {
            let vector = vec![1.0; len];
            match layout.pack(&vector) {
                Err(ServingError::FeatureArity { expected, actual }) => {
                    assert_eq!(expected, 4);
                    assert_eq!(actual, len);
                }
                other => panic!("expected arity error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_iris_index_table() {
        let layout = FeatureLayout::iris();
        let expected = vec![
            (0, "petal_length".to_string()),
            (1, "petal_width".to_string()),
            (2, "sepal_length".to_string()),
            (3, "sepal_width".to_string()),
        ];
        assert_eq!(layout.entries(), expected.as_slice());
        assert_eq!(layout.len(), 4);
        assert!(!layout.is_empty());
        assert_eq!(FeatureLayout::from_names(IRIS_FIELDS).unwrap(), layout);
    }

    #[test]
    fn test_new_sorts_by_index() {
        let layout = FeatureLayout::new(vec![(1, "b".to_string()), (0, "a".to_string())]).unwrap();
        assert_eq!(layout.names(), vec!["a", "b"]);

        let record = layout.pack(&[10.0, 20.0]).unwrap();
        assert_eq!(record.get("a"), Some(&[10.0f32][..]));
        assert_eq!(record.get("b"), Some(&[20.0f32][..]));
    }

    #[test]
    fn test_invalid_layouts() {
        assert!(FeatureLayout::new(vec![]).is_err());
        assert!(FeatureLayout::new(vec![(0, "a".into()), (0, "b".into())]).is_err());
        assert!(FeatureLayout::new(vec![(0, "a".into()), (2, "b".into())]).is_err());
        assert!(FeatureLayout::new(vec![(0, "a".into()), (1, "a".into())]).is_err());
        assert!(FeatureLayout::from_names([""]).is_err());
    }
}
