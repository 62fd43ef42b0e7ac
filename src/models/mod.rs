//! Model loading and inference components

pub mod inference;
pub mod layout;
pub mod loader;
pub mod runtime;
#[cfg(feature = "tensorflow")]
pub mod tensorflow;

pub use inference::InferenceEngine;
pub use layout::FeatureLayout;
pub use loader::ModelLoader;
pub use runtime::{LoadedModel, ModelRuntime, TensorContract};
#[cfg(feature = "tensorflow")]
pub use self::tensorflow::TensorFlowRuntime;
