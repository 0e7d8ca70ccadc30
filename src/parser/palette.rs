//! Palette file parser.
//!
//! Parses JSON palette files of the form
//! `{"00": {"hex": "#1a1a1a"}, "01": {"rgb": [255, 255, 255]}}`
//! into a [`Palette`], keeping the declared key order.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ConvError, Result};
use crate::types::{Colour, Palette};

/// One palette entry as written in the file. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct RawEntry {
    hex: Option<String>,
    rgb: Option<[u8; 3]>,
}

/// Load and validate a palette file.
pub fn load_palette(path: &Path) -> Result<Palette> {
    let source = fs::read_to_string(path).map_err(|e| ConvError::Palette {
        path: Some(path.to_path_buf()),
        message: format!("Failed to read palette file {}: {}", path.display(), e),
        help: Some("Pass --palette or set `palette:` in pxconv.yaml".to_string()),
    })?;

    parse_palette_json(&source).map_err(|e| match e {
        ConvError::Palette { message, help, .. } => ConvError::Palette {
            path: Some(path.to_path_buf()),
            message: format!("{}: {}", path.display(), message),
            help,
        },
        other => other,
    })
}

/// Parse palette JSON text.
pub fn parse_palette_json(source: &str) -> Result<Palette> {
    let root: Value = serde_json::from_str(source).map_err(|e| ConvError::Palette {
        path: None,
        message: format!("Invalid JSON: {}", e),
        help: None,
    })?;

    let object = match root {
        Value::Object(map) => map,
        _ => {
            return Err(ConvError::Palette {
                path: None,
                message: "Palette must be a JSON object of key -> entry".to_string(),
                help: Some("Example: {\"00\": {\"hex\": \"#1a1a1a\"}}".to_string()),
            })
        }
    };

    let mut colours = Vec::with_capacity(object.len());
    for (key, value) in object {
        let colour = parse_entry(&key, value)?;
        colours.push((key, colour));
    }

    Palette::new(colours)
}

/// Parse a single entry object into a colour.
fn parse_entry(key: &str, value: Value) -> Result<Colour> {
    let entry: RawEntry = serde_json::from_value(value).map_err(|e| {
        ConvError::palette(format!("Entry {:?} is malformed: {}", key, e))
    })?;

    match (entry.hex, entry.rgb) {
        (Some(hex), _) => Colour::from_hex(&hex).map_err(|e| match e {
            ConvError::Palette { message, help, .. } => ConvError::Palette {
                path: None,
                message: format!("Entry {:?}: {}", key, message),
                help,
            },
            other => other,
        }),
        (None, Some([r, g, b])) => Ok(Colour::rgb(r, g, b)),
        (None, None) => Err(ConvError::Palette {
            path: None,
            message: format!("Entry {:?} has no colour", key),
            help: Some("Each entry needs a \"hex\" string or an \"rgb\" triple".to_string()),
        }),
    }
}

/// Serialize a palette back to `key -> {"hex": "#rrggbb"}` JSON in declared order.
pub fn palette_to_json(palette: &Palette) -> Result<String> {
    let mut map = Map::new();
    for (key, colour) in palette.colours() {
        let mut entry = Map::new();
        entry.insert("hex".to_string(), Value::String(colour.to_hex()));
        map.insert(key.to_string(), Value::Object(entry));
    }
    serde_json::to_string_pretty(&Value::Object(map))
        .map_err(|e| ConvError::palette(format!("Failed to serialize palette: {}", e)))
}
