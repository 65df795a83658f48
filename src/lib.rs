//! Image classification and resizing engine.
//!
//! Front ends (CLI, web API, GUI) call [`engine::predict`], [`stub::predict`] or
//! [`transform::resize`]; everything else is the machinery behind them.

pub mod config;
pub mod engine;
pub mod errors;
pub mod input;
pub mod labels;
pub mod model;
pub mod preprocess;
pub mod stub;
pub mod traits;
pub mod transform;

pub mod mocks;

pub use config::{build_backend, BackendKind, ModelOptions};
pub use engine::{predict, InferenceEngine};
pub use errors::{ClassifyError, Result};
pub use input::ImageInput;
pub use labels::LabelTable;
pub use model::OnnxClassifier;
pub use preprocess::Preprocessor;
pub use stub::StubEngine;
pub use traits::*;
pub use transform::resize;

/// Installs the `tracing` subscriber used by the binary.
///
/// Filtering follows `RUST_LOG`; output goes to stderr so stdout only carries results.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
