use std::path::Path;

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::prelude::*;
use tempfile::TempDir;

use image_classify_rs::{
    build_backend, preprocess, stub, BackendKind, ClassifierModel, ClassifyError, ImageInput,
    InferenceEngine, LabelTable, ModelOptions, PredictionBackend, Preprocessor,
};

// Stand-in model defined inside the integration test
#[derive(Debug, Clone)]
struct TestMockModel {
    labels: LabelTable,
}

impl TestMockModel {
    fn new() -> Self {
        Self {
            labels: LabelTable::from_json_str(r#"{"0": "cat", "1": "dog"}"#).unwrap(),
        }
    }
}

impl ClassifierModel for TestMockModel {
    // bright images are "dog", dark ones "cat"
    fn classify(&self, tensor: ArrayView4<f32>) -> image_classify_rs::Result<usize> {
        Ok(usize::from(tensor.sum() > 0.0))
    }

    fn labels(&self) -> &LabelTable {
        &self.labels
    }
}

fn red_jpeg(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("test.jpg");
    RgbImage::from_pixel(100, 100, Rgb([255, 0, 0]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn test_resize_red_image_to_32() {
    let temp_dir = TempDir::new().unwrap();
    let path = red_jpeg(temp_dir.path());

    assert_eq!(image_classify_rs::resize(path.as_path(), 32, 32).unwrap(), (32, 32));
}

#[test]
fn test_resize_validates_width_before_height() {
    let temp_dir = TempDir::new().unwrap();
    let path = red_jpeg(temp_dir.path());

    let err = image_classify_rs::resize(path.as_path(), 0, 0).unwrap_err();
    assert_eq!(err.to_string(), "'width' must be a positive value");

    let err = image_classify_rs::resize(path.as_path(), 32, 0).unwrap_err();
    assert_eq!(err.to_string(), "'height' must be a positive value");
}

#[test]
fn test_stub_predict_with_empty_class_list() {
    let temp_dir = TempDir::new().unwrap();
    let path = red_jpeg(temp_dir.path());

    let err = stub::predict(path, &Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, ClassifyError::InvalidInput { .. }));
}

#[test]
fn test_nonexistent_path_is_not_found_everywhere() {
    let missing = "nonexistent.jpg";

    assert!(image_classify_rs::predict(missing).unwrap_err().is_not_found());
    assert!(stub::predict(missing, &["cat", "dog"]).unwrap_err().is_not_found());
    assert!(image_classify_rs::resize(missing, 32, 32)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_stub_predict_from_uploaded_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let bytes = std::fs::read(red_jpeg(temp_dir.path())).unwrap();

    let image = image::load_from_memory(&bytes).unwrap();
    let names = stub::parse_class_names("cat,dog,bird");
    let label = stub::predict(image, &names).unwrap();
    assert!(names.contains(&label));
}

#[test]
fn test_preprocess_shape() {
    let temp_dir = TempDir::new().unwrap();
    let tensor = Preprocessor::new()
        .preprocess(&ImageInput::from(red_jpeg(temp_dir.path())))
        .unwrap();

    let size = preprocess::IMAGE_SIZE as usize;
    assert_eq!(tensor.shape(), &[1, 3, size, size]);
}

#[test]
fn test_engine_with_mock_model() {
    let engine = InferenceEngine::from_model(TestMockModel::new());

    let bright = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, Rgb([250, 250, 250])));
    let dark = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, Rgb([5, 5, 5])));
    assert_eq!(bright.dimensions(), (50, 50));

    assert_eq!(engine.predict(&ImageInput::from(bright.clone())).unwrap(), "dog");
    assert_eq!(engine.predict(&ImageInput::from(dark)).unwrap(), "cat");
    assert_eq!(engine.predict(&ImageInput::from(bright)).unwrap(), "dog");
}

#[test]
fn test_onnx_backend_without_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let backend = build_backend(
        BackendKind::Onnx,
        ModelOptions::in_dir(temp_dir.path()),
        None,
    )
    .unwrap();
    let input = ImageInput::from(red_jpeg(temp_dir.path()));

    let err = backend.predict(&input).unwrap_err();
    assert!(matches!(err, ClassifyError::Initialization { .. }), "{err}");
}

#[test]
#[ignore = "needs model/model.onnx, model/labels.json and tests/fixtures/{cat,dog}.jpg"]
fn test_known_samples_with_real_model() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));

    let dog = image_classify_rs::predict(root.join("tests/fixtures/dog.jpg")).unwrap();
    let cat = image_classify_rs::predict(root.join("tests/fixtures/cat.jpg")).unwrap();
    assert_eq!(dog, "dog");
    assert_eq!(cat, "cat");

    let again = image_classify_rs::predict(root.join("tests/fixtures/dog.jpg")).unwrap();
    assert_eq!(dog, again);
}
