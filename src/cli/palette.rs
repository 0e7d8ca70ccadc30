use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::parser::{load_palette, palette_to_json};
use crate::types::Palette;

/// Validate a palette file and list its colours
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Palette JSON file
    #[arg(required = true)]
    pub file: PathBuf,

    /// Print the palette back as normalized JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<()> {
    let palette = load_palette(&args.file)?;

    printer.status(
        "Loaded",
        &format!(
            "{} from {}",
            plural(palette.len(), "colour", "colours"),
            display_path(&args.file)
        ),
    );

    if args.json {
        println!("{}", palette_to_json(&palette)?);
    } else {
        print!("{}", describe(&palette));
    }

    printer.info(
        "Extremes",
        &format!("darkest {}, lightest {}", palette.darkest(), palette.lightest()),
    );

    Ok(())
}

/// One line per entry: key, hex, and Lab coordinates.
fn describe(palette: &Palette) -> String {
    let width = palette.colours().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for entry in palette.entries() {
        out.push_str(&format!(
            "{:<width$}  {}  L {:6.2}  a {:7.2}  b {:7.2}\n",
            entry.key,
            entry.colour.to_hex(),
            entry.lab.l,
            entry.lab.a,
            entry.lab.b,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;

    #[test]
    fn test_describe() {
        let palette = Palette::new([("0", Colour::BLACK), ("white", Colour::WHITE)]).unwrap();
        let text = describe(&palette);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0      #000000  L   0.00"), "{}", lines[0]);
        assert!(lines[1].starts_with("white  #ffffff  L 100.00"), "{}", lines[1]);
    }

    #[test]
    fn test_run_rejects_bad_palette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"00": {}}"#).unwrap();
        let args = PaletteArgs { file: path, json: false };
        assert!(run(args, &Printer::new()).is_err());
    }
}
