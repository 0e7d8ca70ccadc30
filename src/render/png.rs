//! PNG preview output for converted grids.
//!
//! Paints each command's palette colour into a grid and writes it with
//! optional integer scaling.

use std::path::Path;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::error::{ConvError, Result};
use crate::pipeline::MAX_WORKING_SIZE;
use crate::types::{Command, Palette};

/// Paint commands onto a transparent `size x size` grid.
///
/// Commands outside the grid or with keys missing from the palette are
/// ignored.
pub fn render_commands(commands: &[Command], palette: &Palette, size: u32) -> RgbaImage {
    let mut img: RgbaImage = ImageBuffer::new(size, size);

    for command in commands {
        if command.x >= size || command.y >= size {
            continue;
        }
        if let Some(colour) = palette.get(&command.key) {
            img.put_pixel(command.x, command.y, Rgba(colour.to_rgba()));
        }
    }

    img
}

/// Write a grid to a PNG file.
///
/// # Arguments
///
/// * `grid` - The pixel grid to write
/// * `path` - Output file path
/// * `scale` - Integer scale factor (1 = no scaling)
pub fn write_png(grid: &RgbaImage, path: &Path, scale: u32) -> Result<()> {
    let (width, height) = grid.dimensions();
    let side = width.max(height);
    if side.checked_mul(scale.max(1)).map_or(true, |s| s > MAX_WORKING_SIZE) {
        return Err(ConvError::Processing {
            message: format!("Preview scale {} is too large for a {}x{} grid", scale, width, height),
            help: Some(format!("Keep the scaled preview within {} pixels", MAX_WORKING_SIZE)),
        });
    }
    let scaled = scale_pixels(grid, scale);

    scaled.save(path).map_err(|e| ConvError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write PNG: {}", e),
    })?;

    Ok(())
}

/// Scale a grid by an integer factor.
///
/// Uses nearest-neighbour scaling for crisp pixel art.
pub fn scale_pixels(grid: &RgbaImage, scale: u32) -> RgbaImage {
    let scale = scale.max(1); // Minimum scale of 1
    if scale == 1 {
        return grid.clone();
    }

    let (width, height) = grid.dimensions();
    ImageBuffer::from_fn(width * scale, height * scale, |x, y| {
        *grid.get_pixel(x / scale, y / scale)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;
    use tempfile::tempdir;

    fn cell(grid: &RgbaImage, x: u32, y: u32) -> Option<Colour> {
        (x < grid.width() && y < grid.height()).then(|| Colour::from_rgba(grid.get_pixel(x, y).0))
    }

    fn palette() -> Palette {
        Palette::new([("00", Colour::BLACK), ("01", Colour::WHITE), ("05", Colour::rgb(255, 0, 0))])
            .unwrap()
    }

    #[test]
    fn test_render_commands() {
        let commands = vec![Command::new(0, 0, "05"), Command::new(1, 1, "01")];
        let grid = render_commands(&commands, &palette(), 2);

        assert_eq!(cell(&grid, 0, 0), Some(Colour::rgb(255, 0, 0)));
        assert_eq!(cell(&grid, 1, 1), Some(Colour::WHITE));
        // Pixels without a command stay transparent
        assert_eq!(cell(&grid, 1, 0), Some(Colour::TRANSPARENT));
        assert_eq!(cell(&grid, 5, 0), None);
    }

    #[test]
    fn test_render_ignores_unknown_and_out_of_bounds() {
        let commands = vec![Command::new(0, 0, "zz"), Command::new(9, 0, "00")];
        let grid = render_commands(&commands, &palette(), 2);
        assert!(grid.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_write_png_simple() {
        let grid = ImageBuffer::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });

        let dir = tempdir().unwrap();
        let path = dir.path().join("test.png");

        write_png(&grid, &path, 1).unwrap();

        assert!(path.exists());

        // Read back and verify
        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 2);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]); // Black
        assert_eq!(img.get_pixel(1, 0).0, [255, 255, 255, 255]); // White
    }

    #[test]
    fn test_write_png_scaled() {
        let grid = ImageBuffer::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 255])
            }
        });

        let dir = tempdir().unwrap();
        let path = dir.path().join("scaled.png");

        write_png(&grid, &path, 2).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 2);

        // Check that scaling filled correctly
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]); // Red
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]); // Red (scaled)
        assert_eq!(img.get_pixel(2, 0).0, [0, 255, 0, 255]); // Green
        assert_eq!(img.get_pixel(3, 1).0, [0, 255, 0, 255]); // Green (scaled)
    }

    #[test]
    fn test_write_png_scale_zero_treated_as_one() {
        let grid: RgbaImage = ImageBuffer::from_pixel(1, 1, Rgba([0, 0, 0, 255]));

        let dir = tempdir().unwrap();
        let path = dir.path().join("zero.png");

        write_png(&grid, &path, 0).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 1);
        assert_eq!(img.height(), 1);
    }

    #[test]
    fn test_write_png_rejects_huge_scale() {
        let grid: RgbaImage = ImageBuffer::new(32, 32);
        let dir = tempdir().unwrap();
        let path = dir.path().join("huge.png");

        let err = write_png(&grid, &path, 100_000).unwrap_err();
        assert!(matches!(err, ConvError::Processing { .. }));
        assert!(write_png(&grid, &path, u32::MAX).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_png_bad_path() {
        let grid: RgbaImage = ImageBuffer::new(1, 1);
        let err = write_png(&grid, Path::new("/nonexistent/dir/out.png"), 1).unwrap_err();
        assert!(matches!(err, ConvError::Io { .. }));
    }
}
