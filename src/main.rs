use clap::Parser;
use miette::Result;
use pxconv::cli::{Cli, Commands};
use pxconv::output::Printer;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "pxconv=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let printer = Printer::new();

    match cli.command {
        Commands::Convert(args) => pxconv::cli::convert::run(args, &printer)?,
        Commands::Palette(args) => pxconv::cli::palette::run(args, &printer)?,
        Commands::Init(args) => pxconv::cli::init::run(args, &printer)?,
        Commands::Completions(args) => pxconv::cli::completions::run(args)?,
    }

    Ok(())
}
