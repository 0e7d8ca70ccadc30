//! pxconv - Photo to pixel-art command converter
//!
//! A library for turning arbitrary photos into a fixed-size grid of
//! `!pixel x,y,key` draw commands against a named colour palette.

pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod scanner;
pub mod types;

pub use config::{Config, CONFIG_FILENAME};
pub use error::{ConvError, Result};
pub use matcher::{closest, closest_index, Matcher, Metric};
pub use parser::{load_palette, palette_to_json, parse_palette_json};
pub use pipeline::{
    decode, ConvertOptions, Conversion, Converter, ImageOps, PipelineMode, StandardOps,
};
pub use render::{render_commands, write_png};
pub use types::{derive_perceptual, format_commands, Colour, Command, Lab, Palette};
