//! The photo to pixel-art conversion pipeline.
//!
//! Stages run strictly in sequence, each taking a borrowed raster and
//! returning a new one:
//!
//! ```text
//! normalize ──► quantize (dither + median) ──┐
//!     │                                      ├─► composite ─► denoise ─► downsample ─► emit
//!     └───────► extract_lines ───────────────┘
//! ```
//!
//! The palette is borrowed read-only for the whole conversion, so one
//! palette can back any number of independent conversions.

mod composite;
mod dither;
mod emit;
mod lines;
mod normalize;
mod ops;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{ConvError, Result};
use crate::matcher::{Matcher, Metric};
use crate::types::{Command, Palette};

pub use composite::{alpha_mask, composite, denoise, downsample};
pub use dither::{dither_floyd_steinberg, quantize};
pub use emit::emit;
pub use lines::{binarize, extract_lines, luma, INK};
pub use normalize::{crop_box, normalize, MAX_WORKING_SIZE};
pub use ops::{ImageOps, StandardOps};

/// Which pipeline variant to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// Supersample, dither, line art, composite, denoise, downsample.
    #[default]
    Full,
    /// Two-step Lanczos resize and direct nearest-colour mapping.
    Direct,
}

impl FromStr for PipelineMode {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(PipelineMode::Full),
            "direct" => Ok(PipelineMode::Direct),
            _ => Err(ConvError::Config {
                message: format!("Unknown pipeline mode: {}", s),
                help: Some("Use `full` or `direct`".to_string()),
            }),
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineMode::Full => write!(f, "full"),
            PipelineMode::Direct => write!(f, "direct"),
        }
    }
}

/// Largest median or rank window side.
pub const MAX_WINDOW_SIZE: u32 = 255;

/// Tuning for a conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Side of the final square grid.
    pub target_size: u32,
    /// Working canvas is `target_size * supersample` on a side.
    pub supersample: u32,
    /// Colour distance used for dithering and emission.
    pub metric: Metric,
    pub mode: PipelineMode,
    /// Median window applied after dithering (odd, 1 disables).
    pub median_size: u32,
    /// Rank filter window used to denoise the composite (odd).
    pub rank_size: u32,
    /// Rank index into the sorted `rank_size²` neighbourhood.
    pub rank: usize,
    /// Contour values below this become ink.
    pub line_threshold: u8,
    /// Pixels with alpha below this emit no command.
    pub alpha_threshold: u8,
    /// Overlay the ink layer in full mode.
    pub line_art: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            target_size: 32,
            supersample: 10,
            metric: Metric::Lab,
            mode: PipelineMode::Full,
            median_size: 11,
            rank_size: 5,
            rank: 20,
            line_threshold: 128,
            alpha_threshold: 128,
            line_art: true,
        }
    }
}

impl ConvertOptions {
    /// Check the options for values no stage can honour.
    pub fn validate(&self) -> Result<()> {
        if self.target_size == 0 {
            return Err(invalid("size must be at least 1"));
        }
        if self.supersample == 0 {
            return Err(invalid("supersample must be at least 1"));
        }
        match self.canvas_size() {
            Some(side) if side <= MAX_WORKING_SIZE => {}
            _ => {
                return Err(invalid(&format!(
                    "{} mode canvas for size {} exceeds {}x{}",
                    self.mode, self.target_size, MAX_WORKING_SIZE, MAX_WORKING_SIZE
                )))
            }
        }
        if self.median_size == 0 || self.median_size % 2 == 0 {
            return Err(invalid("median_size must be odd"));
        }
        if self.rank_size == 0 || self.rank_size % 2 == 0 {
            return Err(invalid("rank_size must be odd"));
        }
        if self.median_size > MAX_WINDOW_SIZE || self.rank_size > MAX_WINDOW_SIZE {
            return Err(invalid(&format!(
                "filter windows must be at most {}",
                MAX_WINDOW_SIZE
            )));
        }
        let window = self.rank_size as usize * self.rank_size as usize;
        if self.rank >= window {
            return Err(invalid(&format!(
                "rank {} is out of range for a {}x{} window (max {})",
                self.rank,
                self.rank_size,
                self.rank_size,
                window - 1
            )));
        }
        Ok(())
    }

    /// Side of the supersampled working canvas.
    pub fn working_size(&self) -> Option<u32> {
        self.target_size.checked_mul(self.supersample)
    }

    /// Side of the largest raster the selected mode allocates.
    pub fn canvas_size(&self) -> Option<u32> {
        match self.mode {
            PipelineMode::Full => self.working_size(),
            PipelineMode::Direct => self.target_size.checked_mul(DIRECT_SCALE),
        }
    }
}

/// Direct mode normalizes to this multiple of the target first.
const DIRECT_SCALE: u32 = 4;

fn invalid(message: &str) -> ConvError {
    ConvError::Processing {
        message: format!("Invalid options: {}", message),
        help: None,
    }
}

/// Result of a conversion: the final grid and its commands.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Final `target x target` raster.
    pub grid: RgbaImage,
    /// Draw commands in row-major order.
    pub commands: Vec<Command>,
}

/// Runs the pipeline for one palette and set of options.
pub struct Converter<'a> {
    palette: &'a Palette,
    options: ConvertOptions,
    ops: Box<dyn ImageOps + 'a>,
}

impl<'a> Converter<'a> {
    /// Create a converter using [`StandardOps`].
    pub fn new(palette: &'a Palette, options: ConvertOptions) -> Result<Self> {
        Self::with_ops(palette, options, StandardOps)
    }

    /// Create a converter with a custom filter implementation.
    pub fn with_ops(
        palette: &'a Palette,
        options: ConvertOptions,
        ops: impl ImageOps + 'a,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            palette,
            options,
            ops: Box::new(ops),
        })
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn palette(&self) -> &'a Palette {
        self.palette
    }

    /// Decode an image file and convert it.
    pub fn convert_path(&self, path: &Path) -> Result<Conversion> {
        let image = decode(path)?;
        self.convert(&image)
    }

    /// Convert an already decoded image.
    pub fn convert(&self, image: &RgbaImage) -> Result<Conversion> {
        let mut matcher = Matcher::new(self.palette, self.options.metric);

        let grid = match self.options.mode {
            PipelineMode::Full => self.full(image, &mut matcher)?,
            PipelineMode::Direct => self.direct(image)?,
        };

        let commands = emit(&grid, &mut matcher, self.options.alpha_threshold);
        tracing::debug!(commands = commands.len(), "emitted commands");

        Ok(Conversion { grid, commands })
    }

    fn full(&self, image: &RgbaImage, matcher: &mut Matcher<'_>) -> Result<RgbaImage> {
        let opts = &self.options;
        let ops = self.ops.as_ref();
        let working = opts
            .working_size()
            .ok_or_else(|| invalid("size * supersample is too large"))?;

        let normalized = normalize(image, working, ops)?;
        tracing::debug!(
            from = ?image.dimensions(),
            to = working,
            "normalized"
        );

        let alpha = alpha_mask(&normalized);

        let fill = quantize(&normalized, matcher, opts.median_size, ops);
        tracing::debug!(median = opts.median_size, "quantized fill layer");

        let ink = if opts.line_art {
            let ink = extract_lines(&normalized, opts.line_threshold, ops);
            let count = ink.pixels().filter(|p| p[0] != 0).count();
            tracing::debug!(ink_pixels = count, "extracted line art");
            ink
        } else {
            image::GrayImage::new(working, working)
        };

        let darkest = self
            .palette
            .get(self.palette.darkest())
            .ok_or_else(|| ConvError::processing("Palette has no darkest colour"))?;
        let layered = composite(&fill, &ink, &alpha, darkest)?;

        let clean = denoise(&layered, opts.rank_size, opts.rank, ops);
        tracing::debug!(size = opts.rank_size, rank = opts.rank, "denoised");

        Ok(downsample(&clean, opts.target_size, ops))
    }

    fn direct(&self, image: &RgbaImage) -> Result<RgbaImage> {
        let opts = &self.options;
        let ops = self.ops.as_ref();
        let intermediate = opts
            .canvas_size()
            .ok_or_else(|| invalid("size is too large"))?;

        let normalized = normalize(image, intermediate, ops)?;
        tracing::debug!(from = ?image.dimensions(), to = intermediate, "normalized");

        Ok(ops.resize(&normalized, opts.target_size, opts.target_size))
    }
}

/// Decode an image file to RGBA.
pub fn decode(path: &Path) -> Result<RgbaImage> {
    let reader = image::ImageReader::open(path).map_err(|e| ConvError::ImageDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let reader = reader.with_guessed_format().map_err(|e| ConvError::ImageDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let image = reader.decode().map_err(|e| ConvError::ImageDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(image.to_rgba8())
}
