//! Single-model inference engine for Iris classification

use crate::config::{AppConfig, ModelConfig};
use crate::error::{Result, ServingError};
use crate::feature_extractor::{FeatureExtractor, IrisFeatureSpec};
use crate::models::layout::FeatureLayout;
use crate::models::loader::ModelLoader;
use crate::models::runtime::{LoadedModel, ModelRuntime, TensorContract};
use crate::types::iris::Iris;
use crate::types::record::FeatureRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Lifecycle state of the model handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Open,
    Closed,
}

/// Inference engine owning one loaded model.
///
/// The handle is released by [`InferenceEngine::close`] or, failing that, when
/// the engine is dropped. Once closed, every operation fails with
/// [`ServingError::Closed`].
pub struct InferenceEngine {
    /// Loaded model, `None` once closed
    model: Option<Box<dyn LoadedModel>>,
    /// Directory the model was loaded from
    export_dir: PathBuf,
    /// Input/output binding names
    contract: TensorContract,
    /// Vector index to field name table
    layout: FeatureLayout,
    /// Feature extractor for typed records
    extractor: Box<dyn FeatureExtractor<Iris>>,
}

impl InferenceEngine {
    /// Open the export described by `config` with the given runtime
    pub fn open<R>(runtime: &R, config: &ModelConfig) -> Result<Self>
    where
        R: ModelRuntime + ?Sized,
    {
        let loader = ModelLoader::with_tags(config.tags.clone());
        let model = loader.load_model(runtime, &config.export_dir)?;

        let engine = Self {
            model: Some(model),
            export_dir: config.export_dir.clone(),
            contract: config.contract(),
            layout: FeatureLayout::iris(),
            extractor: Box::new(IrisFeatureSpec::new()),
        };

        info!(
            path = %engine.export_dir.display(),
            input = %engine.contract.input,
            output = %engine.contract.output,
            "Inference engine initialized"
        );

        Ok(engine)
    }

    /// Open a TensorFlow SavedModel export with the default contract
    #[cfg(feature = "tensorflow")]
    pub fn from_export_dir<P: AsRef<Path>>(export_dir: P) -> Result<Self> {
        let runtime = crate::models::tensorflow::TensorFlowRuntime::new();
        Self::open(&runtime, &ModelConfig::new(export_dir.as_ref()))
    }

    /// Open the configured export with the given runtime, applying the
    /// configured feature layout
    pub fn open_with_config<R>(runtime: &R, config: &AppConfig) -> anyhow::Result<Self>
    where
        R: ModelRuntime + ?Sized,
    {
        use anyhow::Context;

        let layout = config.features.layout()?;
        let engine = Self::open(runtime, &config.model)
            .with_context(|| format!("Failed to open model at {:?}", config.model.export_dir))?;
        Ok(engine.with_layout(layout))
    }

    /// Create a TensorFlow-backed engine from application configuration
    #[cfg(feature = "tensorflow")]
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let runtime = crate::models::tensorflow::TensorFlowRuntime::new();
        Self::open_with_config(&runtime, config)
    }

    /// Replace the feature layout
    pub fn with_layout(mut self, layout: FeatureLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the feature extractor
    pub fn with_extractor<E>(mut self, extractor: E) -> Self
    where
        E: FeatureExtractor<Iris> + 'static,
    {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn state(&self) -> ModelState {
        if self.model.is_some() {
            ModelState::Open
        } else {
            ModelState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == ModelState::Open
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn contract(&self) -> &TensorContract {
        &self.contract
    }

    fn model(&self) -> Result<&dyn LoadedModel> {
        self.model.as_deref().ok_or(ServingError::Closed)
    }

    /// Extract features from a record and pack them into a named-field record
    pub fn extract_features(&self, input: &Iris, settings: &str) -> Result<FeatureRecord> {
        self.model()?;

        let features = self.extractor.extract(input, settings)?;
        let record = self.layout.pack(&features)?;

        debug!(features = ?features, "Features extracted");

        Ok(record)
    }

    /// Run the model on a feature record and return the predicted class id
    pub fn predict(&self, record: &FeatureRecord) -> Result<i64> {
        let model = self.model()?;

        // rank 1 batch holding a single serialized record
        let batch = vec![record.encode()?];

        let class_ids = model
            .run_inference(&self.contract.input, &batch, &self.contract.output)
            .map_err(|e| match e {
                ServingError::Execution(_) | ServingError::Closed => e,
                other => ServingError::execution(other),
            })?;

        let class_id = class_ids.first().copied().ok_or_else(|| {
            ServingError::execution(format!("output {} is empty", self.contract.output))
        })?;

        debug!(class_id = class_id, "Prediction complete");

        Ok(class_id)
    }

    /// Extract features and predict in one call
    pub fn predict_iris(&self, input: &Iris, settings: &str) -> Result<i64> {
        let record = self.extract_features(input, settings)?;
        self.predict(&record)
    }

    /// Release the model handle. Closing an already closed engine does nothing.
    pub fn close(&mut self) -> Result<()> {
        match self.model.take() {
            Some(mut model) => {
                info!(path = %self.export_dir.display(), "Closing model");
                model.close()
            }
            None => Ok(()),
        }
    }
}

impl Drop for InferenceEngine {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!(
                path = %self.export_dir.display(),
                error = %e,
                "Failed to release model"
            );
        }
    }
}
