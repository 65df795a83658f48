use ndarray::prelude::*;
use ort::session::Session;
use ort::value::TensorRef;
use parking_lot::Mutex;

use crate::{
    config::ModelOptions,
    errors::{ClassifyError, Result},
    labels::LabelTable,
    preprocess::IMAGE_SIZE,
    traits::ClassifierModel,
};

/// ONNX Runtime classifier with its label table.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    labels: LabelTable,
}

impl OnnxClassifier {
    pub fn new(options: &ModelOptions) -> Result<Self> {
        let model_path = options.model_path();
        let labels_path = options.labels_path();

        if !model_path.is_file() {
            return Err(ClassifyError::initialization(
                "model file lookup",
                format!("{} does not exist", model_path.display()),
            ));
        }
        let labels = LabelTable::from_json_file(&labels_path)?;

        let mut session = Session::builder()
            .map_err(|e| ClassifyError::initialization("session builder", e))?
            .with_intra_threads(options.intra_threads)
            .map_err(|e| ClassifyError::initialization("intra-op thread setup", e))?
            .commit_from_file(&model_path)
            .map_err(|e| {
                ClassifyError::initialization(format!("model load: {}", model_path.display()), e)
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| ClassifyError::initialization("model input lookup", "no inputs"))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| ClassifyError::initialization("model output lookup", "no outputs"))?;

        // initialize model
        let data = Array4::<f32>::zeros((1, 3, IMAGE_SIZE as usize, IMAGE_SIZE as usize));
        let logits = run_logits(&mut session, &input_name, &output_name, data.view())
            .map_err(|e| ClassifyError::initialization("model warm-up", e))?;
        if logits.len() != labels.len() {
            return Err(ClassifyError::initialization(
                "label table check",
                format!(
                    "model produces {} classes but {} has {} labels",
                    logits.len(),
                    labels_path.display(),
                    labels.len()
                ),
            ));
        }

        tracing::info!(
            "loaded model {} ({} classes, {} intra-op threads)",
            model_path.display(),
            labels.len(),
            options.intra_threads
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            labels,
        })
    }
}

impl ClassifierModel for OnnxClassifier {
    fn classify(&self, tensor: ArrayView4<f32>) -> Result<usize> {
        let logits = {
            let mut session = self.session.lock();
            run_logits(&mut session, &self.input_name, &self.output_name, tensor)?
        };
        argmax(logits.view()).ok_or_else(|| ClassifyError::Prediction {
            message: "model output contains no comparable logits".to_string(),
        })
    }

    fn labels(&self) -> &LabelTable {
        &self.labels
    }
}

/// Logits of the first batch element.
fn run_logits(
    session: &mut Session,
    input_name: &str,
    output_name: &str,
    tensor: ArrayView4<f32>,
) -> Result<Array1<f32>> {
    let outputs = session.run(
        ort::inputs![input_name => TensorRef::from_array_view(&tensor.as_standard_layout())?],
    )?;
    let logits = outputs[output_name].try_extract_array::<f32>()?;

    if logits.ndim() == 1 {
        return Ok(logits.into_dimensionality::<Ix1>()?.to_owned());
    }
    let logits = logits.into_dimensionality::<Ix2>()?;
    if logits.nrows() == 0 {
        return Err(ClassifyError::Prediction {
            message: "model returned an empty batch".to_string(),
        });
    }
    Ok(logits.row(0).to_owned())
}

/// Index of the largest value; ties go to the first occurrence and NaN never wins.
pub fn argmax(values: ArrayView1<f32>) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f32)>, (index, &value)| match best {
            Some((_, best_value)) if value <= best_value => best,
            _ => Some((index, value)),
        })
        .map(|(index, _)| index)
}
