//! Project configuration (pxconv.yaml) parsing.
//!
//! The config file holds defaults for the palette path, output settings
//! and pipeline tuning. Every field is optional; command-line flags win
//! over file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConvError, Result};
use crate::matcher::Metric;
use crate::pipeline::{ConvertOptions, PipelineMode};

/// Config file name looked up in the working directory.
pub const CONFIG_FILENAME: &str = "pxconv.yaml";

/// Project config loaded from pxconv.yaml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Palette JSON file, relative to the config file.
    pub palette: Option<PathBuf>,

    /// Output directory for command and preview files.
    pub output: Option<PathBuf>,

    /// Preview scale factor.
    pub scale: Option<u32>,

    pub metric: Option<Metric>,
    pub mode: Option<PipelineMode>,
    pub size: Option<u32>,
    pub supersample: Option<u32>,
    pub median_size: Option<u32>,
    pub rank_size: Option<u32>,
    pub rank: Option<usize>,
    pub line_threshold: Option<u8>,
    pub alpha_threshold: Option<u8>,
    pub line_art: Option<bool>,
}

impl Config {
    /// Load config from a pxconv.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConvError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        let mut config = Self::parse(&content)?;

        // Palette paths are relative to the config file
        if let (Some(palette), Some(dir)) = (&config.palette, path.parent()) {
            if palette.is_relative() {
                config.palette = Some(dir.join(palette));
            }
        }

        Ok(config)
    }

    /// Load `dir/pxconv.yaml` if it exists, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConvError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Pipeline options with file values layered over the defaults.
    pub fn convert_options(&self) -> ConvertOptions {
        let d = ConvertOptions::default();
        ConvertOptions {
            target_size: self.size.unwrap_or(d.target_size),
            supersample: self.supersample.unwrap_or(d.supersample),
            metric: self.metric.unwrap_or(d.metric),
            mode: self.mode.unwrap_or(d.mode),
            median_size: self.median_size.unwrap_or(d.median_size),
            rank_size: self.rank_size.unwrap_or(d.rank_size),
            rank: self.rank.unwrap_or(d.rank),
            line_threshold: self.line_threshold.unwrap_or(d.line_threshold),
            alpha_threshold: self.alpha_threshold.unwrap_or(d.alpha_threshold),
            line_art: self.line_art.unwrap_or(d.line_art),
        }
    }

    /// Get the effective preview scale.
    pub fn effective_scale(&self) -> u32 {
        self.scale.unwrap_or(10)
    }
}

/// Text of a freshly initialised config file.
pub fn default_config_yaml(palette: &str) -> String {
    let d = ConvertOptions::default();
    format!(
        "# pxconv configuration\n\
         palette: {palette}\n\
         metric: {metric}\n\
         mode: {mode}\n\
         size: {size}\n\
         supersample: {supersample}\n\
         median_size: {median}\n\
         rank_size: {rank_size}\n\
         rank: {rank}\n\
         line_threshold: {line}\n\
         alpha_threshold: {alpha}\n\
         line_art: {line_art}\n\
         scale: 10\n",
        metric = d.metric,
        mode = d.mode,
        size = d.target_size,
        supersample = d.supersample,
        median = d.median_size,
        rank_size = d.rank_size,
        rank = d.rank,
        line = d.line_threshold,
        alpha = d.alpha_threshold,
        line_art = d.line_art,
    )
}
