//! TensorFlow SavedModel runtime

use crate::error::{Result, ServingError};
use crate::models::runtime::{LoadedModel, ModelRuntime};
use std::path::Path;
use tensorflow::{Graph, Operation, SavedModelBundle, SessionOptions, SessionRunArgs, Tensor};
use tracing::{debug, info};

/// Runtime backed by the TensorFlow C library
#[derive(Default)]
pub struct TensorFlowRuntime {
    _private: (),
}

impl TensorFlowRuntime {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelRuntime for TensorFlowRuntime {
    fn name(&self) -> &str {
        "tensorflow"
    }

    fn load_model(&self, export_dir: &Path, tags: &[String]) -> Result<Box<dyn LoadedModel>> {
        let mut graph = Graph::new();
        let bundle = SavedModelBundle::load(&SessionOptions::new(), tags, &mut graph, export_dir)
            .map_err(|status| ServingError::load(export_dir, status))?;

        info!(
            path = %export_dir.display(),
            signatures = bundle.meta_graph_def().signatures().len(),
            "TensorFlow session created"
        );

        Ok(Box::new(TensorFlowModel {
            graph,
            bundle,
            closed: false,
        }))
    }
}

/// A SavedModel bundle with its graph
struct TensorFlowModel {
    graph: Graph,
    bundle: SavedModelBundle,
    closed: bool,
}

/// Split a binding `name:index` into operation name and output index.
fn parse_binding(binding: &str) -> (&str, i32) {
    match binding.rsplit_once(':') {
        Some((name, index)) => match index.parse() {
            Ok(index) => (name, index),
            Err(_) => (binding, 0),
        },
        None => (binding, 0),
    }
}

impl TensorFlowModel {
    fn operation(&self, name: &str) -> Result<Operation> {
        self.graph
            .operation_by_name_required(name)
            .map_err(ServingError::execution)
    }
}

impl LoadedModel for TensorFlowModel {
    fn run_inference(&self, input: &str, batch: &[Vec<u8>], output: &str) -> Result<Vec<i64>> {
        if self.closed {
            return Err(ServingError::Closed);
        }

        let (input_name, input_index) = parse_binding(input);
        let (output_name, output_index) = parse_binding(output);
        let input_op = self.operation(input_name)?;
        let output_op = self.operation(output_name)?;

        // rank 1: one serialized record per batch element
        let mut examples = Tensor::<String>::new(&[batch.len() as u64]);
        // TODO: fill from bytes directly once the tensorflow crate has a
        // byte-string element type for DT_STRING and drop the unsafe below.
        for (slot, bytes) in examples.iter_mut().zip(batch) {
            // SAFETY: DT_STRING tensors are byte strings; the value is copied
            // into the tensor buffer as raw bytes and never read back as `str`.
            *slot = unsafe { String::from_utf8_unchecked(bytes.clone()) };
        }

        let mut args = SessionRunArgs::new();
        args.add_feed(&input_op, input_index, &examples);
        let token = args.request_fetch(&output_op, output_index);

        self.bundle
            .session
            .run(&mut args)
            .map_err(ServingError::execution)?;

        let class_ids: Tensor<i64> = args
            .fetch(token)
            .map_err(ServingError::execution)?;

        debug!(dims = ?class_ids.dims(), "Fetched output tensor");

        Ok(class_ids.iter().copied().collect())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.bundle
            .session
            .close()
            .map_err(ServingError::execution)
    }
}
