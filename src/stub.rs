use parking_lot::Mutex;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::errors::{ClassifyError, Result};
use crate::input::ImageInput;
use crate::traits::PredictionBackend;

/// Waste-sorting categories used when the caller supplies none.
pub const DEFAULT_CLASS_NAMES: [&str; 6] =
    ["cardboard", "paper", "plastic", "metal", "trash", "glass"];

enum RandomSource {
    Thread,
    Seeded(Mutex<StdRng>),
}

/// Backend without a model: validates the image, then returns a uniformly random class name.
pub struct StubEngine {
    class_names: Vec<String>,
    rng: RandomSource,
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StubEngine {
    pub fn new() -> Self {
        Self {
            class_names: DEFAULT_CLASS_NAMES.map(String::from).to_vec(),
            rng: RandomSource::Thread,
        }
    }

    pub fn with_class_names(class_names: Vec<String>) -> Result<Self> {
        ensure_not_empty(&class_names)?;
        Ok(Self {
            class_names,
            rng: RandomSource::Thread,
        })
    }

    /// Replaces the thread-local generator with a seeded one for reproducible draws.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = RandomSource::Seeded(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Like [`PredictionBackend::predict`] but with a per-call class list.
    pub fn predict_with<S: AsRef<str>>(
        &self,
        input: &ImageInput,
        class_names: &[S],
    ) -> Result<String> {
        ensure_not_empty(class_names)?;
        validate_image(input)?;

        let choice = match &self.rng {
            RandomSource::Thread => class_names.choose(&mut rand::thread_rng()),
            RandomSource::Seeded(rng) => class_names.choose(&mut *rng.lock()),
        };
        choice
            .map(|name| name.as_ref().to_string())
            .ok_or_else(empty_class_names)
    }
}

impl PredictionBackend for StubEngine {
    fn predict(&self, input: &ImageInput) -> Result<String> {
        self.predict_with(input, &self.class_names)
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// One-shot stub prediction with an unseeded generator.
pub fn predict<S: AsRef<str>>(input: impl Into<ImageInput>, class_names: &[S]) -> Result<String> {
    StubEngine::new().predict_with(&input.into(), class_names)
}

/// Splits a comma-separated list, trimming whitespace and dropping empty entries.
pub fn parse_class_names(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

fn ensure_not_empty<S>(class_names: &[S]) -> Result<()> {
    if class_names.is_empty() {
        return Err(empty_class_names());
    }
    Ok(())
}

fn empty_class_names() -> ClassifyError {
    ClassifyError::InvalidInput {
        message: "class_names cannot be empty".to_string(),
    }
}

/// Decodes the image only to prove it is well formed; the pixels are dropped.
fn validate_image(input: &ImageInput) -> Result<()> {
    input.load_rgb().map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn red_image() -> ImageInput {
        ImageInput::from(RgbImage::from_pixel(100, 100, Rgb([255, 0, 0])))
    }

    #[test]
    fn test_result_is_member_of_class_names() -> Result<()> {
        let names = ["cat", "dog", "bird"];
        for _ in 0..20 {
            let label = predict(red_image(), &names)?;
            assert!(names.contains(&label.as_str()), "{label}");
        }
        Ok(())
    }

    #[test]
    fn test_default_class_names() -> Result<()> {
        let engine = StubEngine::new();
        assert_eq!(engine.class_names().len(), 6);

        let label = engine.predict(&red_image())?;
        assert!(DEFAULT_CLASS_NAMES.contains(&label.as_str()), "{label}");
        Ok(())
    }

    #[test]
    fn test_empty_class_names() {
        let err = predict(red_image(), &[] as &[&str]).unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidInput { .. }), "{err}");
        assert!(err.to_string().contains("class_names cannot be empty"));

        assert!(StubEngine::with_class_names(Vec::new()).is_err());
    }

    #[test]
    fn test_missing_and_unreadable_files() {
        let err = predict("nonexistent.jpg", &["cat"]).unwrap_err();
        assert!(err.is_not_found(), "{err}");

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.txt");
        std::fs::write(&path, b"not an image").unwrap();
        let err = predict(path, &["cat"]).unwrap_err();
        assert!(matches!(err, ClassifyError::Read { .. }), "{err}");
    }

    #[test]
    fn test_seeded_draws_are_reproducible() -> Result<()> {
        let names = parse_class_names("a,b,c,d,e");
        let first = StubEngine::with_class_names(names.clone())?.seeded(42);
        let second = StubEngine::with_class_names(names)?.seeded(42);

        let draws = |engine: &StubEngine| -> Result<Vec<String>> {
            (0..16).map(|_| engine.predict(&red_image())).collect()
        };
        assert_eq!(draws(&first)?, draws(&second)?);
        Ok(())
    }

    #[test]
    fn test_every_class_is_reachable() -> Result<()> {
        let engine = StubEngine::with_class_names(parse_class_names("cat,dog,bird"))?.seeded(7);
        let seen: HashSet<String> = (0..200)
            .map(|_| engine.predict(&red_image()))
            .collect::<Result<_>>()?;
        assert_eq!(seen.len(), 3);
        Ok(())
    }

    #[test]
    fn test_parse_class_names() {
        assert_eq!(parse_class_names(" cat, dog ,bird"), ["cat", "dog", "bird"]);
        assert_eq!(parse_class_names("cat,,dog,"), ["cat", "dog"]);
        assert!(parse_class_names(" , ").is_empty());
    }
}
