//! Runs the adapter against a real Iris estimator export.
//!
//! Requires the `tensorflow` feature and an export produced by the Iris
//! training job, e.g.:
//!
//! ```sh
//! IRIS_EXPORT_DIR=/path/to/export/1528387402 \
//!     cargo test --features tensorflow -- --ignored
//! ```

use model_serving::{InferenceEngine, Iris, ServingError};
use std::path::PathBuf;

fn export_dir() -> PathBuf {
    std::env::var_os("IRIS_EXPORT_DIR")
        .map(PathBuf::from)
        .expect("IRIS_EXPORT_DIR must point at an Iris SavedModel export")
}

#[test]
#[ignore]
fn test_setosa_prediction() {
    let mut engine = InferenceEngine::from_export_dir(export_dir()).unwrap();

    let record = engine
        .extract_features(&Iris::new(5.1, 3.5, 1.4, 0.2), "[]")
        .unwrap();
    let first = engine.predict(&record).unwrap();

    assert_eq!(first, 0);
    assert_eq!(engine.predict(&record).unwrap(), first);

    engine.close().unwrap();
    assert!(engine.predict(&record).unwrap_err().is_closed());
}

#[test]
#[ignore]
fn test_missing_feature_rejected_by_graph() {
    let engine = InferenceEngine::from_export_dir(export_dir()).unwrap();

    let mut record = engine
        .extract_features(&Iris::new(5.1, 3.5, 1.4, 0.2), "[]")
        .unwrap();
    record.remove("sepal_width");

    assert!(matches!(
        engine.predict(&record),
        Err(ServingError::Execution(_))
    ));
}

#[test]
fn test_open_non_export_fails() {
    let dir = tempfile::TempDir::new().unwrap();

    let result = InferenceEngine::from_export_dir(dir.path());
    assert!(matches!(result, Err(ServingError::Load { .. })));
}
