use image::{imageops, imageops::FilterType, RgbImage};

use crate::errors::{ClassifyError, Result};
use crate::input::ImageInput;

/// Resizes to exactly `width` x `height` (aspect ratio is not kept) and returns the new size.
///
/// Both dimensions are checked before the input is opened, width first.
pub fn resize(input: impl Into<ImageInput>, width: i64, height: i64) -> Result<(u32, u32)> {
    resize_image(input, width, height).map(|image| image.dimensions())
}

/// Same as [`resize`] but hands back the resized RGB bitmap.
pub fn resize_image(input: impl Into<ImageInput>, width: i64, height: i64) -> Result<RgbImage> {
    let width = positive_dimension(width, "width")?;
    let height = positive_dimension(height, "height")?;

    let rgb = input.into().load_rgb()?;
    tracing::debug!(
        "resizing {}x{} image to {width}x{height}",
        rgb.width(),
        rgb.height()
    );
    Ok(imageops::resize(&rgb, width, height, FilterType::CatmullRom))
}

fn positive_dimension(value: i64, field: &'static str) -> Result<u32> {
    if value <= 0 {
        return Err(ClassifyError::InvalidDimension { field });
    }
    u32::try_from(value).map_err(|_| ClassifyError::InvalidInput {
        message: format!("'{field}' is too large: {value}"),
    })
}
