//! Type definitions for model inputs and the wire format

pub mod example;
pub mod iris;
pub mod record;

pub use iris::Iris;
pub use record::FeatureRecord;
