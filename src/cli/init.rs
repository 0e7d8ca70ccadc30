//! Init command implementation.
//!
//! Writes a `pxconv.yaml` with the default pipeline settings.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{default_config_yaml, CONFIG_FILENAME};
use crate::error::{ConvError, Result};
use crate::output::{display_path, Printer};

/// Initialize a pxconv.yaml config file
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write the config into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Palette file to reference
    #[arg(long, default_value = "palette.json")]
    pub palette: String,

    /// Overwrite existing pxconv.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    // Check for existing config
    if config_path.exists() && !args.force {
        return Err(ConvError::Config {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    fs::write(&config_path, default_config_yaml(&args.palette)).map_err(|e| ConvError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.success("Created", &display_path(&config_path));

    if !args.path.join(&args.palette).exists() {
        printer.warning(
            "Warning",
            &format!("palette file {} does not exist yet", args.palette),
        );
    }

    Ok(())
}
