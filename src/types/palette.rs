//! Palette type for ordered, keyed colour collections.

use std::collections::HashMap;

use crate::error::{ConvError, Result};

use super::{Colour, Lab};

/// Largest palette accepted by the converter.
pub const MAX_PALETTE_SIZE: usize = 256;

/// One keyed palette colour with its cached Lab coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub key: String,
    pub colour: Colour,
    pub lab: Lab,
}

/// An ordered collection of keyed colours.
///
/// Declaration order is kept; it decides tie-breaks in matching and
/// the index of each key. Immutable once built.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Entries in declaration order.
    entries: Vec<PaletteEntry>,

    /// Key -> position in `entries`.
    index: HashMap<String, usize>,
}

impl Palette {
    /// Build a palette from `(key, colour)` pairs in declaration order.
    ///
    /// Fails on an empty list, duplicate keys, or more than
    /// [`MAX_PALETTE_SIZE`] entries.
    pub fn new<K: Into<String>>(colours: impl IntoIterator<Item = (K, Colour)>) -> Result<Self> {
        let mut entries = Vec::new();
        let mut index = HashMap::new();

        for (key, colour) in colours {
            let key = key.into();
            if index.contains_key(&key) {
                return Err(ConvError::palette(format!("Duplicate palette key: {}", key)));
            }
            let colour = Colour::rgb(colour.r, colour.g, colour.b);
            index.insert(key.clone(), entries.len());
            entries.push(PaletteEntry {
                key,
                colour,
                lab: Lab::from_colour(colour),
            });
        }

        if entries.is_empty() {
            return Err(ConvError::Palette {
                path: None,
                message: "Palette has no colours".to_string(),
                help: Some("Add at least one entry such as {\"00\": {\"hex\": \"#000000\"}}".to_string()),
            });
        }

        if entries.len() > MAX_PALETTE_SIZE {
            return Err(ConvError::palette(format!(
                "Palette has {} colours (maximum is {})",
                entries.len(),
                MAX_PALETTE_SIZE
            )));
        }

        Ok(Self { entries, index })
    }

    /// Get a colour by key.
    pub fn get(&self, key: &str) -> Option<Colour> {
        self.index.get(key).map(|&i| self.entries[i].colour)
    }

    /// Get the cached Lab coordinates for a key.
    pub fn lab(&self, key: &str) -> Option<Lab> {
        self.index.get(key).map(|&i| self.entries[i].lab)
    }

    /// Position of a key in declaration order.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// All `(key, colour)` pairs in declaration order.
    pub fn colours(&self) -> impl Iterator<Item = (&str, Colour)> {
        self.entries.iter().map(|e| (e.key.as_str(), e.colour))
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Entry at a declaration index.
    pub fn entry(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    /// Get the number of colours.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed palette; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key of the lowest-luminance colour. Ties keep the earlier key.
    pub fn darkest(&self) -> &str {
        let mut best = &self.entries[0];
        for entry in &self.entries[1..] {
            if entry.colour.luminance() < best.colour.luminance() {
                best = entry;
            }
        }
        &best.key
    }

    /// Key of the highest-luminance colour. Ties keep the earlier key.
    pub fn lightest(&self) -> &str {
        let mut best = &self.entries[0];
        for entry in &self.entries[1..] {
            if entry.colour.luminance() > best.colour.luminance() {
                best = entry;
            }
        }
        &best.key
    }
}

/// Key -> Lab map for every palette entry.
pub fn derive_perceptual(palette: &Palette) -> HashMap<String, Lab> {
    palette
        .entries()
        .iter()
        .map(|e| (e.key.clone(), Lab::from_colour(e.colour)))
        .collect()
}
