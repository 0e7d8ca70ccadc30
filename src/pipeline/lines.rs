//! Line-art (ink) mask extraction.

use image::{GrayImage, Luma, RgbaImage};

use crate::types::Colour;

use super::ops::ImageOps;

/// Mask value for ink pixels.
pub const INK: u8 = 255;

/// Build an ink mask from the image's contours.
///
/// Converts to luma, runs the contour filter, and marks every pixel whose
/// filtered value is below `threshold` as ink (255); everything else is 0.
pub fn extract_lines(image: &RgbaImage, threshold: u8, ops: &dyn ImageOps) -> GrayImage {
    let contour = ops.contour(&luma(image));
    binarize(&contour, threshold)
}

/// Luma with the same weights as [`Colour::luminance`], rounded. Alpha is ignored.
pub fn luma(image: &RgbaImage) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let l = Colour::from_rgba(image.get_pixel(x, y).0).luminance();
        Luma([l.round().clamp(0.0, 255.0) as u8])
    })
}

/// `value < threshold` becomes ink.
pub fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        if image.get_pixel(x, y)[0] < threshold {
            Luma([INK])
        } else {
            Luma([0])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ops::StandardOps;
    use image::Rgba;

    #[test]
    fn test_flat_image_has_no_ink() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        let mask = extract_lines(&img, 128, &StandardOps);
        assert_eq!(mask.dimensions(), (8, 8));
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_edge_produces_ink_on_dark_side() {
        let img = RgbaImage::from_fn(8, 4, |x, _| {
            if x < 4 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let mask = extract_lines(&img, 128, &StandardOps);
        for y in 0..4 {
            assert_eq!(mask.get_pixel(3, y)[0], INK);
            assert_eq!(mask.get_pixel(4, y)[0], 0);
            assert_eq!(mask.get_pixel(0, y)[0], 0);
        }
    }

    #[test]
    fn test_luma_weights() {
        let img = RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => Rgba([0, 120, 0, 255]),
            1 => Rgba([150, 0, 0, 255]),
            _ => Rgba([127, 127, 127, 0]),
        });
        let l = luma(&img);
        assert_eq!(l.as_raw(), &vec![70, 45, 127]);
    }

    #[test]
    fn test_low_contrast_hue_edge_is_not_ink() {
        // Luma step 70 -> 45; the contour only reaches 255 - 3 * 25 = 180
        let img = RgbaImage::from_fn(8, 4, |x, _| {
            if x < 4 {
                Rgba([0, 120, 0, 255])
            } else {
                Rgba([150, 0, 0, 255])
            }
        });
        let mask = extract_lines(&img, 128, &StandardOps);
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_binarize_threshold_is_exclusive() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[127, 128, 129][x as usize]]));
        let mask = binarize(&img, 128);
        assert_eq!(mask.get_pixel(0, 0)[0], INK);
        assert_eq!(mask.get_pixel(1, 0)[0], 0);
        assert_eq!(mask.get_pixel(2, 0)[0], 0);
    }
}
