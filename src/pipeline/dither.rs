//! Palette quantization with Floyd-Steinberg error diffusion.

use image::{Rgba, RgbaImage};

use crate::matcher::Matcher;
use crate::types::Colour;

use super::ops::ImageOps;

/// Error weights for the right and lower neighbours.
///
/// ```text
///        *   7/16
///  3/16 5/16 1/16
/// ```
const FLOYD_STEINBERG: [(i64, i64, f32); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// Dither onto the palette, then smooth with a `median_size` median filter.
///
/// The result has the same dimensions and alpha as the input. Before the
/// smoothing pass every opaque pixel is an exact palette colour.
pub fn quantize(
    image: &RgbaImage,
    matcher: &mut Matcher<'_>,
    median_size: u32,
    ops: &dyn ImageOps,
) -> RgbaImage {
    let dithered = dither_floyd_steinberg(image, matcher);
    if median_size <= 1 {
        return dithered;
    }
    ops.median(&dithered, median_size)
}

/// Floyd-Steinberg error diffusion against the matcher's palette.
///
/// Processes pixels left-to-right, top-to-bottom. Fully transparent pixels
/// are passed through untouched and neither receive nor spread error.
pub fn dither_floyd_steinberg(image: &RgbaImage, matcher: &mut Matcher<'_>) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut out = RgbaImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let (w, h) = (width as usize, height as usize);

    // Working buffer with f32 channels for error accumulation
    let mut buf: Vec<[f32; 3]> = image
        .pixels()
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect();
    let transparent: Vec<bool> = image.pixels().map(|p| p[3] == 0).collect();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let src = image.get_pixel(x as u32, y as u32);
            if transparent[i] {
                out.put_pixel(x as u32, y as u32, *src);
                continue;
            }

            let old = buf[i];
            let wanted = Colour::rgb(
                old[0].round().clamp(0.0, 255.0) as u8,
                old[1].round().clamp(0.0, 255.0) as u8,
                old[2].round().clamp(0.0, 255.0) as u8,
            );
            let new = matcher.colour(wanted);
            out.put_pixel(x as u32, y as u32, Rgba([new.r, new.g, new.b, src[3]]));

            let err = [
                old[0] - new.r as f32,
                old[1] - new.g as f32,
                old[2] - new.b as f32,
            ];

            for &(dx, dy, weight) in &FLOYD_STEINBERG {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || nx >= w as i64 || ny >= h as i64 {
                    continue;
                }
                let n = ny as usize * w + nx as usize;
                if transparent[n] {
                    continue;
                }
                for c in 0..3 {
                    buf[n][c] += err[c] * weight;
                }
            }
        }
    }

    out
}
