use crate::errors::Result;
use crate::labels::LabelTable;
use crate::model::argmax;
use crate::traits::ClassifierModel;
use ndarray::prelude::*;

/// Model stand-in for tests: picks the channel with the highest mean activation.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    labels: LabelTable,
}

impl MockClassifier {
    pub const fn new(labels: LabelTable) -> Self {
        Self { labels }
    }
}

impl ClassifierModel for MockClassifier {
    fn classify(&self, tensor: ArrayView4<f32>) -> Result<usize> {
        let means = tensor
            .mean_axis(Axis(3))
            .and_then(|t| t.mean_axis(Axis(2)))
            .and_then(|t| t.mean_axis(Axis(0)))
            .ok_or_else(|| crate::ClassifyError::Prediction {
                message: "empty tensor".to_string(),
            })?;
        argmax(means.view())
            .map(|index| index % self.labels.len())
            .ok_or_else(|| crate::ClassifyError::Prediction {
                message: "no finite channel means".to_string(),
            })
    }

    fn labels(&self) -> &LabelTable {
        &self.labels
    }
}

/// Mock whose labels name the dominant color channel.
pub fn create_mock_classifier() -> MockClassifier {
    let labels = ["red", "green", "blue"].map(String::from).to_vec();
    MockClassifier::new(LabelTable::new(labels).expect("static label list is non-empty"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_classifier_creation() {
        let mock = create_mock_classifier();
        assert_eq!(mock.labels().len(), 3);
        assert_eq!(mock.label_for(2).unwrap(), "blue");
        assert!(mock.label_for(3).is_err());
    }

    #[test]
    fn test_mock_classifier_classify() -> Result<()> {
        let mock = create_mock_classifier();
        let mut tensor = Array4::<f32>::zeros((1, 3, 224, 224));
        tensor.slice_mut(s![.., 1, .., ..]).fill(1.0);

        assert_eq!(mock.classify(tensor.view())?, 1);
        Ok(())
    }
}
