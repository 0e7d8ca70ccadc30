//! Raster filters used by the pipeline stages.
//!
//! Stages never call a filter implementation directly; they go through
//! [`ImageOps`] so any library meeting the contracts below can be swapped
//! in. [`StandardOps`] implements them on top of the `image` crate.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbaImage};

/// Contour kernel: eight-neighbour Laplacian, offset so flat areas are white.
const CONTOUR_KERNEL: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]];
const CONTOUR_OFFSET: i32 = 255;

/// Image-processing capabilities the pipeline depends on.
///
/// All neighbourhood filters treat out-of-bounds samples as the nearest
/// edge pixel.
pub trait ImageOps {
    /// High-quality (Lanczos) resize to exactly `width x height`.
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage;

    /// Contour filter: flat regions map to 255, edges pull towards 0.
    fn contour(&self, image: &GrayImage) -> GrayImage;

    /// Per-channel median over a `size x size` window on R, G and B.
    /// Alpha is copied through.
    fn median(&self, image: &RgbaImage, size: u32) -> RgbaImage;

    /// Per-channel rank filter over a `size x size` window, all four
    /// channels. `rank` indexes the ascending sorted neighbourhood.
    fn rank(&self, image: &RgbaImage, size: u32, rank: usize) -> RgbaImage;

    /// Nearest-neighbour reduction sampling the centre of each block.
    fn downsample(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage;
}

/// Default [`ImageOps`] built on the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardOps;

impl ImageOps for StandardOps {
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        if image.dimensions() == (width, height) {
            return image.clone();
        }
        imageops::resize(image, width, height, FilterType::Lanczos3)
    }

    fn contour(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let mut out = GrayImage::new(width, height);
        if width == 0 || height == 0 {
            return out;
        }

        for y in 0..height {
            for x in 0..width {
                let mut sum = 0;
                for (ky, row) in CONTOUR_KERNEL.iter().enumerate() {
                    for (kx, &weight) in row.iter().enumerate() {
                        let sx = clamp_coord(x as i64 + kx as i64 - 1, width);
                        let sy = clamp_coord(y as i64 + ky as i64 - 1, height);
                        sum += weight * image.get_pixel(sx, sy)[0] as i32;
                    }
                }
                let value = (sum + CONTOUR_OFFSET).clamp(0, 255) as u8;
                out.put_pixel(x, y, Luma([value]));
            }
        }

        out
    }

    fn median(&self, image: &RgbaImage, size: u32) -> RgbaImage {
        let rank = (size as usize * size as usize) / 2;
        rank_filter(image, size, rank, 3)
    }

    fn rank(&self, image: &RgbaImage, size: u32, rank: usize) -> RgbaImage {
        rank_filter(image, size, rank, 4)
    }

    fn downsample(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        let (src_w, src_h) = image.dimensions();
        let mut out = RgbaImage::new(width, height);
        if src_w == 0 || src_h == 0 {
            return out;
        }

        for y in 0..height {
            let sy = block_centre(y, src_h, height);
            for x in 0..width {
                let sx = block_centre(x, src_w, width);
                out.put_pixel(x, y, *image.get_pixel(sx, sy));
            }
        }

        out
    }
}

/// Centre of destination cell `i` mapped into a source axis of length `src`.
fn block_centre(i: u32, src: u32, dst: u32) -> u32 {
    let pos = ((2 * i as u64 + 1) * src as u64) / (2 * dst as u64);
    (pos as u32).min(src - 1)
}

fn clamp_coord(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}

/// Rank filter over the first `channels` channels; the rest are copied.
fn rank_filter(image: &RgbaImage, size: u32, rank: usize, channels: usize) -> RgbaImage {
    let (width, height) = image.dimensions();
    if size <= 1 || width == 0 || height == 0 {
        return image.clone();
    }

    let half = (size / 2) as i64;
    let window = (size * size) as usize;
    let rank = rank.min(window - 1);
    let mut out = image.clone();
    let mut samples: Vec<Vec<u8>> = vec![Vec::with_capacity(window); channels];

    for y in 0..height {
        for x in 0..width {
            for s in samples.iter_mut() {
                s.clear();
            }

            for dy in -half..=half {
                let sy = clamp_coord(y as i64 + dy, height);
                for dx in -half..=half {
                    let sx = clamp_coord(x as i64 + dx, width);
                    let p = image.get_pixel(sx, sy);
                    for (c, s) in samples.iter_mut().enumerate() {
                        s.push(p[c]);
                    }
                }
            }

            let px = out.get_pixel_mut(x, y);
            for (c, s) in samples.iter_mut().enumerate() {
                let (_, value, _) = s.select_nth_unstable(rank);
                px[c] = *value;
            }
        }
    }

    out
}
