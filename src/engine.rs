use once_cell::sync::{Lazy, OnceCell};

use crate::{
    config::ModelOptions,
    errors::{ClassifyError, Result},
    input::ImageInput,
    model::OnnxClassifier,
    preprocess::Preprocessor,
    traits::{ClassifierModel, PredictionBackend},
};

type Loader<M> = Box<dyn Fn() -> Result<M> + Send + Sync>;

/// `predict` entry point over a lazily loaded model.
///
/// The model is built on first use and then shared read-only. Concurrent first calls run the
/// loader at most once; a failed load is not remembered, so the next call tries again.
pub struct InferenceEngine<M = OnnxClassifier> {
    model: OnceCell<M>,
    loader: Loader<M>,
    preprocessor: Preprocessor,
}

static GLOBAL_ENGINE: Lazy<InferenceEngine<OnnxClassifier>> =
    Lazy::new(|| InferenceEngine::<OnnxClassifier>::onnx(ModelOptions::default()));

/// The process-wide engine over the default model artifacts.
pub fn global() -> &'static InferenceEngine<OnnxClassifier> {
    &GLOBAL_ENGINE
}

/// Classifies `input` with the process-wide engine.
pub fn predict(input: impl Into<ImageInput>) -> Result<String> {
    GLOBAL_ENGINE.predict(&input.into())
}

impl InferenceEngine<OnnxClassifier> {
    pub fn onnx(options: ModelOptions) -> Self {
        Self::with_loader(move || OnnxClassifier::new(&options))
    }
}

impl<M: ClassifierModel> InferenceEngine<M> {
    pub fn with_loader<F>(loader: F) -> Self
    where
        F: Fn() -> Result<M> + Send + Sync + 'static,
    {
        Self {
            model: OnceCell::new(),
            loader: Box::new(loader),
            preprocessor: Preprocessor::new(),
        }
    }

    /// An engine whose model is already loaded.
    pub fn from_model(model: M) -> Self {
        let engine = Self::with_loader(|| {
            Err(ClassifyError::initialization(
                "model load",
                "engine was built from a preloaded model",
            ))
        });
        // a fresh cell cannot already be set
        let _ = engine.model.set(model);
        engine
    }

    pub fn is_initialized(&self) -> bool {
        self.model.get().is_some()
    }

    /// The shared model, loading it on first call.
    pub fn model(&self) -> Result<&M> {
        self.model.get_or_try_init(|| {
            tracing::debug!("initializing classifier model");
            (self.loader)()
        })
    }

    /// Classifies one image.
    ///
    /// A missing input file is reported as `NotFound` before the model is touched. Every
    /// later failure other than model initialization comes back as `Prediction`.
    pub fn predict(&self, input: &ImageInput) -> Result<String> {
        let rgb = input.load_rgb().map_err(into_prediction_error)?;
        let model = self.model()?;

        let tensor = self.preprocessor.preprocess_rgb(&rgb);
        let index = model
            .classify(tensor.view())
            .map_err(into_prediction_error)?;
        let label = model.label_for(index).map_err(into_prediction_error)?;

        tracing::debug!("predicted class {index} ({label})");
        Ok(label.to_string())
    }
}

impl<M: ClassifierModel> PredictionBackend for InferenceEngine<M> {
    fn predict(&self, input: &ImageInput) -> Result<String> {
        InferenceEngine::predict(self, input)
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

fn into_prediction_error(err: ClassifyError) -> ClassifyError {
    match err {
        ClassifyError::NotFound { .. } | ClassifyError::Prediction { .. } => err,
        other => ClassifyError::Prediction {
            message: other.to_string(),
        },
    }
}
