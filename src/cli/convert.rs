//! Convert command implementation.
//!
//! Turns image files into `!pixel` command lists, optionally writing a
//! scaled PNG preview of each result.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Config;
use crate::error::{ConvError, Result};
use crate::matcher::Metric;
use crate::output::{display_path, plural, Printer};
use crate::parser::load_palette;
use crate::pipeline::{ConvertOptions, Converter, PipelineMode};
use crate::render::{render_commands, write_png};
use crate::scanner::collect_inputs;
use crate::types::{format_commands, Palette};

/// Convert images into pixel draw commands
#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Image files or directories to convert
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Palette JSON file
    #[arg(long, short)]
    pub palette: Option<PathBuf>,

    /// Colour distance metric
    #[arg(long, value_enum)]
    pub metric: Option<Metric>,

    /// Pipeline variant
    #[arg(long, value_enum)]
    pub mode: Option<PipelineMode>,

    /// Final grid size
    #[arg(long)]
    pub size: Option<u32>,

    /// Working resolution multiplier
    #[arg(long)]
    pub supersample: Option<u32>,

    /// Skip the line-art overlay
    #[arg(long)]
    pub no_lines: bool,

    /// Output directory (commands go to stdout for a single image without it)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Also write a PNG preview of each result
    #[arg(long)]
    pub preview: bool,

    /// Preview scale factor
    #[arg(long)]
    pub scale: Option<u32>,

    /// Config file (default: ./pxconv.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: ConvertArgs, printer: &Printer) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(Path::new("."))?,
    };

    let palette_path = args
        .palette
        .clone()
        .or_else(|| config.palette.clone())
        .ok_or_else(|| ConvError::Palette {
            path: None,
            message: "No palette file given".to_string(),
            help: Some("Pass --palette <FILE> or set `palette:` in pxconv.yaml".to_string()),
        })?;
    let palette = load_palette(&palette_path)?;
    printer.info(
        "Palette",
        &format!(
            "{} ({})",
            display_path(&palette_path),
            plural(palette.len(), "colour", "colours")
        ),
    );

    let options = resolve_options(&args, &config);
    let converter = Converter::new(&palette, options)?;
    let scale = args.scale.unwrap_or_else(|| config.effective_scale());

    let inputs = collect_inputs(&args.inputs);
    if inputs.is_empty() {
        return Err(ConvError::Io {
            path: args.inputs[0].clone(),
            message: "No image files found".to_string(),
        });
    }

    let output_dir = args.output.clone().or_else(|| config.output.clone());

    // Single image without an output directory: commands to stdout
    if inputs.len() == 1 && output_dir.is_none() {
        let input = &inputs[0];
        let conversion = converter.convert_path(input)?;
        println!("{}", format_commands(&conversion.commands));

        if args.preview {
            let preview_path = PathBuf::from(format!("{}.png", file_stem(input)));
            write_preview(&conversion.commands, &palette, converter.options(), &preview_path, scale)?;
            printer.status("Preview", &display_path(&preview_path));
        }

        printer.success(
            "Finished",
            &plural(conversion.commands.len(), "command", "commands"),
        );
        return Ok(());
    }

    let output_dir = output_dir.unwrap_or_else(|| PathBuf::from("dist"));
    if !output_dir.exists() {
        fs::create_dir_all(&output_dir).map_err(|e| ConvError::Io {
            path: output_dir.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let mut failed = 0;
    for input in &inputs {
        printer.status("Converting", &display_path(input));
        match convert_one(&converter, &palette, input, &output_dir, args.preview, scale) {
            Ok(count) => tracing::debug!(path = %input.display(), commands = count, "converted"),
            Err(e) => {
                // One bad image must not stop the batch
                failed += 1;
                printer.error("Failed", &e.to_string());
            }
        }
    }

    let converted = inputs.len() - failed;
    if failed > 0 {
        return Err(ConvError::Processing {
            message: format!(
                "{} of {} failed",
                plural(failed, "image", "images"),
                inputs.len()
            ),
            help: Some("See the errors above for each failed image".to_string()),
        });
    }

    printer.success(
        "Finished",
        &format!(
            "{} to {}",
            plural(converted, "image", "images"),
            display_path(&output_dir)
        ),
    );

    Ok(())
}

/// Layer command-line flags over config file values.
fn resolve_options(args: &ConvertArgs, config: &Config) -> ConvertOptions {
    let mut options = config.convert_options();
    if let Some(metric) = args.metric {
        options.metric = metric;
    }
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    if let Some(size) = args.size {
        options.target_size = size;
    }
    if let Some(supersample) = args.supersample {
        options.supersample = supersample;
    }
    if args.no_lines {
        options.line_art = false;
    }
    options
}

/// Convert a single file into `<stem>.txt` (and `<stem>.png`).
/// Returns the number of commands written.
fn convert_one(
    converter: &Converter<'_>,
    palette: &Palette,
    input: &Path,
    output_dir: &Path,
    preview: bool,
    scale: u32,
) -> Result<usize> {
    let conversion = converter.convert_path(input)?;
    let stem = file_stem(input);

    let text_path = output_dir.join(format!("{}.txt", stem));
    let mut text = format_commands(&conversion.commands);
    text.push('\n');
    fs::write(&text_path, text).map_err(|e| ConvError::Io {
        path: text_path.clone(),
        message: format!("Failed to write commands: {}", e),
    })?;

    if preview {
        let preview_path = output_dir.join(format!("{}.png", stem));
        write_preview(&conversion.commands, palette, converter.options(), &preview_path, scale)?;
    }

    Ok(conversion.commands.len())
}

fn write_preview(
    commands: &[crate::types::Command],
    palette: &Palette,
    options: &ConvertOptions,
    path: &Path,
    scale: u32,
) -> Result<()> {
    let grid = render_commands(commands, palette, options.target_size);
    write_png(&grid, path, scale)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image")
        .to_string()
}
