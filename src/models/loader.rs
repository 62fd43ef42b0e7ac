//! Saved model loader

use crate::error::{Result, ServingError};
use crate::models::runtime::{LoadedModel, ModelRuntime, SERVE_TAG};
use std::path::Path;
use tracing::{info, warn};

/// Graph definition files an export directory may contain.
const SAVED_MODEL_FILES: [&str; 2] = ["saved_model.pb", "saved_model.pbtxt"];

/// Loader for exported models on the local filesystem
pub struct ModelLoader {
    /// Tags selecting the meta graph to load
    tags: Vec<String>,
}

impl ModelLoader {
    /// Create a new model loader selecting the `serve` graph
    pub fn new() -> Self {
        Self::with_tags(vec![SERVE_TAG.to_string()])
    }

    /// Create a new model loader with specific tags
    pub fn with_tags(tags: Vec<String>) -> Self {
        Self { tags }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Check that `export_dir` looks like a saved model export
    pub fn validate_export_dir(export_dir: &Path) -> Result<()> {
        if !export_dir.exists() {
            return Err(ServingError::load(export_dir, "directory does not exist"));
        }
        if !export_dir.is_dir() {
            return Err(ServingError::load(export_dir, "path is not a directory"));
        }
        if !SAVED_MODEL_FILES
            .iter()
            .any(|file| export_dir.join(file).is_file())
        {
            return Err(ServingError::load(
                export_dir,
                "no saved_model.pb or saved_model.pbtxt found",
            ));
        }
        Ok(())
    }

    /// Load a model export from a local directory
    pub fn load_model<R, P>(&self, runtime: &R, export_dir: P) -> Result<Box<dyn LoadedModel>>
    where
        R: ModelRuntime + ?Sized,
        P: AsRef<Path>,
    {
        let export_dir = export_dir.as_ref();

        info!(
            runtime = %runtime.name(),
            path = %export_dir.display(),
            tags = ?self.tags,
            "Loading saved model"
        );

        if let Err(e) = Self::validate_export_dir(export_dir) {
            warn!(path = %export_dir.display(), error = %e, "Invalid model export");
            return Err(e);
        }

        let model = runtime
            .load_model(export_dir, &self.tags)
            .map_err(|e| match e {
                ServingError::Load { .. } => e,
                other => ServingError::load(export_dir, other),
            })?;

        info!(path = %export_dir.display(), "Model loaded successfully");

        Ok(model)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}
