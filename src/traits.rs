use crate::errors::Result;
use crate::input::ImageInput;
use crate::labels::LabelTable;
use ndarray::prelude::*;

/// A loaded classifier: tensor in, class index out.
///
/// Implementations are immutable after construction and shared across threads.
pub trait ClassifierModel: Send + Sync {
    /// Forward pass plus argmax over the class axis of the single batch element.
    fn classify(&self, tensor: ArrayView4<f32>) -> Result<usize>;

    /// Label table matching the model's output width.
    fn labels(&self) -> &LabelTable;

    fn label_for(&self, index: usize) -> Result<&str> {
        self.labels()
            .get(index)
            .ok_or_else(|| crate::ClassifyError::Prediction {
                message: format!(
                    "class index {index} out of range for {} labels",
                    self.labels().len()
                ),
            })
    }
}

/// Anything that can turn an image into a label.
///
/// The real model engine and the random stub both implement this so front ends select a
/// backend once at startup and share one call site.
pub trait PredictionBackend: Send + Sync {
    fn predict(&self, input: &ImageInput) -> Result<String>;

    /// Short human-readable backend name for logs.
    fn name(&self) -> &'static str;
}

impl<T: PredictionBackend + ?Sized> PredictionBackend for Box<T> {
    fn predict(&self, input: &ImageInput) -> Result<String> {
        (**self).predict(input)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
