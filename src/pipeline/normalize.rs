//! Square crop and resize to the working resolution.

use image::{imageops, RgbaImage};

use crate::error::{ConvError, Result};

use super::ops::ImageOps;

/// Largest canvas side any stage will allocate.
pub const MAX_WORKING_SIZE: u32 = 8192;

/// Centre-crop to a square on the shorter side, then resize to `target x target`.
///
/// The crop offset is `(long - short) / 2` rounded down, so an odd surplus
/// leaves the extra pixel on the right (or bottom) edge.
pub fn normalize(image: &RgbaImage, target: u32, ops: &dyn ImageOps) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ConvError::processing(format!(
            "Cannot normalize an empty {}x{} image",
            width, height
        )));
    }
    if target == 0 {
        return Err(ConvError::processing("Target size must be at least 1"));
    }
    if target > MAX_WORKING_SIZE {
        return Err(ConvError::processing(format!(
            "Target size {} exceeds the maximum canvas side of {}",
            target, MAX_WORKING_SIZE
        )));
    }

    let (x, y, side) = crop_box(width, height);
    let square = if width == height {
        image.clone()
    } else {
        imageops::crop_imm(image, x, y, side, side).to_image()
    };

    Ok(ops.resize(&square, target, target))
}

/// Square crop box `(x, y, side)` centred in a `width x height` image.
pub fn crop_box(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.min(height);
    ((width - side) / 2, (height - side) / 2, side)
}
