use image::{imageops, imageops::FilterType, RgbImage};
use ndarray::prelude::*;
use nshare::AsNdarray3;

use crate::errors::Result;
use crate::input::ImageInput;

/// Side length of the square model input.
pub const IMAGE_SIZE: u32 = 224;
/// ImageNet channel means, RGB order.
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet channel standard deviations, RGB order.
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Turns any image into the `(1, 3, 224, 224)` float tensor the classifier expects.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    image_size: u32,
    mean: [f32; 3],
    std: [f32; 3],
    filter: FilterType,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    pub const fn new() -> Self {
        Self {
            image_size: IMAGE_SIZE,
            mean: MEAN,
            std: STD,
            filter: FilterType::CatmullRom,
        }
    }

    pub const fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn preprocess(&self, input: &ImageInput) -> Result<Array4<f32>> {
        let rgb = input.load_rgb()?;
        Ok(self.preprocess_rgb(&rgb))
    }

    /// Resize, scale to `[0, 1]`, normalize per channel and move channels first.
    pub fn preprocess_rgb(&self, image: &RgbImage) -> Array4<f32> {
        let size = self.image_size;
        let resized = imageops::resize(image, size, size, self.filter);
        tracing::debug!(
            "preprocessing {}x{} image to {size}x{size}",
            image.width(),
            image.height()
        );

        // as_ndarray3 already yields (channel, height, width)
        let mut tensor = resized
            .as_ndarray3()
            .slice_move(s![NewAxis, .., .., ..])
            .mapv(|v| f32::from(v) / 255.0);

        for (channel, mut plane) in tensor.axis_iter_mut(Axis(1)).enumerate() {
            let (mean, std) = (self.mean[channel], self.std[channel]);
            plane.mapv_inplace(|v| (v - mean) / std);
        }

        tensor
    }
}
