//! Draw command emission from the final grid.

use image::RgbaImage;

use crate::matcher::Matcher;
use crate::types::{Colour, Command};

/// Emit one command per pixel with alpha at or above `alpha_threshold`.
///
/// Scan order is row-major (y outer, x inner); consumers rely on it.
pub fn emit(image: &RgbaImage, matcher: &mut Matcher<'_>, alpha_threshold: u8) -> Vec<Command> {
    let mut commands = Vec::new();

    for (x, y, px) in image.enumerate_pixels() {
        if px[3] < alpha_threshold {
            continue;
        }
        let key = matcher.key(Colour::from_rgba(px.0));
        commands.push(Command::new(x, y, key));
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Metric;
    use crate::types::Palette;
    use image::Rgba;

    fn palette() -> Palette {
        Palette::new([("00", Colour::BLACK), ("05", Colour::rgb(255, 0, 0))]).unwrap()
    }

    #[test]
    fn test_row_major_order() {
        let palette = palette();
        let mut matcher = Matcher::new(&palette, Metric::Lab);
        let img = RgbaImage::from_fn(3, 2, |x, _| {
            if x == 1 {
                Rgba([250, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });

        let commands = emit(&img, &mut matcher, 128);
        let positions: Vec<(u32, u32)> = commands.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(positions, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(commands[1].key, "05");
        assert_eq!(commands[0].key, "00");
    }

    #[test]
    fn test_transparent_skipped() {
        let palette = palette();
        let mut matcher = Matcher::new(&palette, Metric::Lab);
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 127]));
        img.put_pixel(1, 1, Rgba([255, 0, 0, 128]));

        let commands = emit(&img, &mut matcher, 128);
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], Command::new(1, 0, "05"));
        assert_eq!(commands[2], Command::new(1, 1, "05"));
    }

    #[test]
    fn test_fully_transparent_yields_nothing() {
        let palette = palette();
        let mut matcher = Matcher::new(&palette, Metric::Lab);
        let img = RgbaImage::new(32, 32);
        assert!(emit(&img, &mut matcher, 128).is_empty());
    }

    #[test]
    fn test_bounds_and_count() {
        let palette = palette();
        let mut matcher = Matcher::new(&palette, Metric::Rgb);
        let img = RgbaImage::from_fn(32, 32, |x, y| Rgba([(x * 8) as u8, 0, 0, (y * 8) as u8]));
        let commands = emit(&img, &mut matcher, 128);
        assert!(commands.len() <= 32 * 32);
        assert!(commands.iter().all(|c| c.x < 32 && c.y < 32));
        // Rows 16.. have alpha >= 128
        assert_eq!(commands.len(), 16 * 32);
    }
}
