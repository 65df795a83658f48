use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::engine::InferenceEngine;
use crate::errors::Result;
use crate::model::OnnxClassifier;
use crate::stub::StubEngine;
use crate::traits::PredictionBackend;

/// Overrides the directory holding `model.onnx` and `labels.json`.
pub const MODEL_DIR_ENV: &str = "IMAGE_CLASSIFY_MODEL_DIR";
pub const MODEL_FILE: &str = "model.onnx";
pub const LABELS_FILE: &str = "labels.json";
pub const DEFAULT_INTRA_THREADS: usize = 4;

/// Where to find the model artifacts and how to run them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOptions {
    pub model_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
    pub intra_threads: usize,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            model_path: None,
            labels_path: None,
            intra_threads: DEFAULT_INTRA_THREADS,
        }
    }
}

impl ModelOptions {
    /// Both artifacts under `dir` with their default file names.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model_path: Some(dir.join(MODEL_FILE)),
            labels_path: Some(dir.join(LABELS_FILE)),
            ..Self::default()
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| default_model_dir().join(MODEL_FILE))
    }

    pub fn labels_path(&self) -> PathBuf {
        self.labels_path
            .clone()
            .unwrap_or_else(|| default_model_dir().join(LABELS_FILE))
    }
}

/// `$IMAGE_CLASSIFY_MODEL_DIR`, or `model/` next to this crate's manifest so the lookup
/// does not depend on the caller's working directory.
pub fn default_model_dir() -> PathBuf {
    std::env::var_os(MODEL_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("model"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Pretrained ONNX model with its label table
    Onnx,
    /// No model; picks a random class name
    Stub,
}

/// Selects the prediction backend once at startup.
///
/// `class_names` only matters for the stub; `None` keeps its default list.
pub fn build_backend(
    kind: BackendKind,
    options: ModelOptions,
    class_names: Option<Vec<String>>,
) -> Result<Box<dyn PredictionBackend>> {
    let backend: Box<dyn PredictionBackend> = match kind {
        BackendKind::Onnx => Box::new(InferenceEngine::<OnnxClassifier>::onnx(options)),
        BackendKind::Stub => match class_names {
            Some(names) => Box::new(StubEngine::with_class_names(names)?),
            None => Box::new(StubEngine::new()),
        },
    };
    tracing::debug!("selected {} backend", backend.name());
    Ok(backend)
}

#[derive(Parser, Debug)]
#[command(version, about = "Classify and transform images", long_about = None)]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = BackendKind::Onnx, global = true)]
    pub backend: BackendKind,

    #[arg(long, global = true)]
    pub model_path: Option<PathBuf>,

    #[arg(long, global = true)]
    pub labels_path: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_INTRA_THREADS, global = true)]
    pub threads: usize,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            model_path: self.model_path.clone(),
            labels_path: self.labels_path.clone(),
            intra_threads: self.threads.max(1),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Commands for image inference operations
    #[command(subcommand)]
    Inference(InferenceCommand),
    /// Commands for image transform operations
    #[command(subcommand)]
    Transform(TransformCommand),
}

#[derive(Subcommand, Debug)]
pub enum InferenceCommand {
    /// Predict the class of one image
    Predict(PredictArgs),
    /// Predict the class of every image under a directory
    PredictDir {
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    pub image_path: PathBuf,

    /// Comma-separated class names; switches to the stub backend
    #[arg(long)]
    pub class_names: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TransformCommand {
    /// Resize an image and report the resulting dimensions
    Resize {
        image_path: PathBuf,
        #[arg(allow_negative_numbers = true)]
        width: i64,
        #[arg(allow_negative_numbers = true)]
        height: i64,
    },
}
