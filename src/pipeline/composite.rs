//! Layer compositing, denoise and final reduction.

use image::{GrayImage, Luma, Rgba, RgbaImage};

use crate::error::{ConvError, Result};
use crate::types::Colour;

use super::ops::ImageOps;

/// Stencil `ink` onto `fill` and reattach the silhouette alpha.
///
/// Wherever the ink mask is non-zero the fill pixel is replaced outright by
/// `ink_colour`. The output alpha always comes from `alpha`, so pixels
/// outside the subject stay transparent whatever was painted there.
pub fn composite(
    fill: &RgbaImage,
    ink: &GrayImage,
    alpha: &GrayImage,
    ink_colour: Colour,
) -> Result<RgbaImage> {
    let dims = fill.dimensions();
    if ink.dimensions() != dims || alpha.dimensions() != dims {
        return Err(ConvError::Processing {
            message: format!(
                "Layer size mismatch: fill {:?}, ink {:?}, alpha {:?}",
                dims,
                ink.dimensions(),
                alpha.dimensions()
            ),
            help: None,
        });
    }

    let mut out = fill.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        if ink.get_pixel(x, y)[0] != 0 {
            *px = Rgba([ink_colour.r, ink_colour.g, ink_colour.b, px[3]]);
        }
        px[3] = alpha.get_pixel(x, y)[0];
    }

    Ok(out)
}

/// Alpha channel of an image as a mask.
pub fn alpha_mask(image: &RgbaImage) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width, height, |x, y| Luma([image.get_pixel(x, y)[3]]))
}

/// Rank-filter speckle removal.
pub fn denoise(image: &RgbaImage, size: u32, rank: usize, ops: &dyn ImageOps) -> RgbaImage {
    ops.rank(image, size, rank)
}

/// Reduce the working canvas to `target x target`.
pub fn downsample(image: &RgbaImage, target: u32, ops: &dyn ImageOps) -> RgbaImage {
    ops.downsample(image, target, target)
}
