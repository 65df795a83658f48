use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, ImageReader, RgbImage};

use crate::errors::{ClassifyError, Result};

/// Either a file on disk or an image that has already been decoded.
#[derive(Debug, Clone)]
pub enum ImageInput {
    Path(PathBuf),
    Image(DynamicImage),
}

impl ImageInput {
    /// Resolves the input to a 3-channel RGB bitmap.
    ///
    /// Paths are checked for existence before anything is decoded so a missing file is
    /// always reported as `NotFound`. Any color mode (luma, alpha, 16-bit, float) is
    /// converted to RGB; alpha is dropped.
    pub fn load_rgb(&self) -> Result<RgbImage> {
        let opened;
        let image = match self {
            Self::Path(path) => {
                opened = open_image(path)?;
                &opened
            }
            Self::Image(image) => image,
        };

        if image.width() == 0 || image.height() == 0 {
            return Err(ClassifyError::InvalidInput {
                message: format!(
                    "image has an empty dimension ({}x{})",
                    image.width(),
                    image.height()
                ),
            });
        }

        Ok(image.to_rgb8())
    }
}

impl From<&str> for ImageInput {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for ImageInput {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<&Path> for ImageInput {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ImageInput {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<DynamicImage> for ImageInput {
    fn from(image: DynamicImage) -> Self {
        Self::Image(image)
    }
}

impl From<RgbImage> for ImageInput {
    fn from(image: RgbImage) -> Self {
        Self::Image(DynamicImage::ImageRgb8(image))
    }
}

fn open_image(path: &Path) -> Result<DynamicImage> {
    // only a confirmed absence is NotFound; an inaccessible path is a read failure
    match path.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            return Err(ClassifyError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(err) => {
            return Err(ClassifyError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            })
        }
    }

    let read_error = |err: ImageError| ClassifyError::Read {
        path: path.display().to_string(),
        message: err.to_string(),
    };

    match image::open(path) {
        Ok(image) => Ok(image),
        Err(err) if should_retry(&err) => {
            tracing::warn!(
                "Standard decode failed for {} ({err}). Retrying with format sniffing.",
                path.display()
            );
            decode_with_guessed_format(path).map_err(read_error)
        }
        Err(err) => Err(read_error(err)),
    }
}

fn should_retry(err: &ImageError) -> bool {
    matches!(err, ImageError::Decoding(_) | ImageError::Unsupported(_))
}

fn decode_with_guessed_format(path: &Path) -> std::result::Result<DynamicImage, ImageError> {
    let file = File::open(path)?;
    let reader = ImageReader::new(BufReader::new(file)).with_guessed_format()?;
    reader.decode()
}
