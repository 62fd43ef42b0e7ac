//! Model runtime capability interface.
//!
//! The adapter never talks to an execution engine directly. A [`ModelRuntime`]
//! opens an export directory into a [`LoadedModel`], and the loaded model runs
//! one batch through named bindings. Concrete engines live behind cargo
//! features; tests use an in-process runtime.

use crate::error::Result;
use std::path::Path;

/// Input binding fed with serialized feature records.
pub const INPUT_BINDING: &str = "input_example_tensor";

/// Output binding holding the predicted class ids.
pub const OUTPUT_BINDING: &str = "linear/head/predictions/class_ids";

/// Tag set selecting the serving graph of an export.
pub const SERVE_TAG: &str = "serve";

/// Opens exported models.
pub trait ModelRuntime {
    /// Runtime name used in logs
    fn name(&self) -> &str;

    /// Load the export at `export_dir`, selecting the graph tagged with `tags`.
    fn load_model(&self, export_dir: &Path, tags: &[String]) -> Result<Box<dyn LoadedModel>>;
}

/// A loaded model holding native session resources.
///
/// Implementations must be `Send`; sharing an engine across threads is up to
/// the caller's own locking.
pub trait LoadedModel: Send {
    /// Feed `batch` (one serialized record per element) to the `input` binding,
    /// run the graph and return the `output` binding as 64-bit integers.
    fn run_inference(&self, input: &str, batch: &[Vec<u8>], output: &str) -> Result<Vec<i64>>;

    /// Release native resources. Called at most once by the adapter.
    fn close(&mut self) -> Result<()>;
}

/// Names of the input and output bindings the adapter uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorContract {
    pub input: String,
    pub output: String,
}

impl TensorContract {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

impl Default for TensorContract {
    fn default() -> Self {
        Self::new(INPUT_BINDING, OUTPUT_BINDING)
    }
}
