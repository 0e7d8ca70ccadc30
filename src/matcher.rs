//! Nearest palette colour search.
//!
//! Maps an arbitrary RGB pixel to the best palette key under either raw
//! RGB distance or CIE L*a*b* distance. The first palette entry is the
//! initial best and later entries only win on a strictly smaller
//! distance, so ties always resolve to the earliest declared key.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConvError, Result};
use crate::types::{Colour, Lab, Palette};

/// Distance metric used to compare a pixel against palette colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Squared Euclidean distance over raw 8-bit channels.
    Rgb,
    /// Squared Euclidean distance in CIE L*a*b*.
    #[default]
    Lab,
}

impl FromStr for Metric {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rgb" => Ok(Metric::Rgb),
            "lab" => Ok(Metric::Lab),
            _ => Err(ConvError::Config {
                message: format!("Unknown metric: {}", s),
                help: Some("Use `rgb` or `lab`".to_string()),
            }),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Rgb => write!(f, "rgb"),
            Metric::Lab => write!(f, "lab"),
        }
    }
}

/// Index of the closest palette entry.
pub fn closest_index(colour: Colour, palette: &Palette, metric: Metric) -> usize {
    let entries = palette.entries();
    let mut best = 0;

    match metric {
        Metric::Rgb => {
            let mut best_dist = rgb_distance_sq(colour, entries[0].colour);
            for (i, entry) in entries.iter().enumerate().skip(1) {
                let dist = rgb_distance_sq(colour, entry.colour);
                if dist < best_dist {
                    best_dist = dist;
                    best = i;
                }
            }
        }
        Metric::Lab => {
            let lab = Lab::from_colour(colour);
            let mut best_dist = lab.distance_sq(&entries[0].lab);
            for (i, entry) in entries.iter().enumerate().skip(1) {
                let dist = lab.distance_sq(&entry.lab);
                if dist < best_dist {
                    best_dist = dist;
                    best = i;
                }
            }
        }
    }

    best
}

/// Key of the closest palette entry.
pub fn closest(colour: Colour, palette: &Palette, metric: Metric) -> &str {
    &palette.entries()[closest_index(colour, palette, metric)].key
}

/// Squared RGB distance in integer arithmetic.
fn rgb_distance_sq(a: Colour, b: Colour) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Palette matcher that remembers colours it has already resolved.
///
/// Rasters repeat colours heavily after quantization, so caching the
/// per-colour answer avoids most Lab conversions. Answers are identical
/// to [`closest`].
#[derive(Debug)]
pub struct Matcher<'a> {
    palette: &'a Palette,
    metric: Metric,
    memo: HashMap<[u8; 3], usize>,
}

impl<'a> Matcher<'a> {
    pub fn new(palette: &'a Palette, metric: Metric) -> Self {
        Self {
            palette,
            metric,
            memo: HashMap::new(),
        }
    }

    pub fn palette(&self) -> &'a Palette {
        self.palette
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Declaration index of the closest entry.
    pub fn index(&mut self, colour: Colour) -> usize {
        let (palette, metric) = (self.palette, self.metric);
        *self
            .memo
            .entry(colour.to_rgb())
            .or_insert_with(|| closest_index(colour, palette, metric))
    }

    /// Key of the closest entry.
    pub fn key(&mut self, colour: Colour) -> &'a str {
        let i = self.index(colour);
        &self.palette.entries()[i].key
    }

    /// Opaque palette colour of the closest entry.
    pub fn colour(&mut self, colour: Colour) -> Colour {
        let i = self.index(colour);
        self.palette.entries()[i].colour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pico_like() -> Palette {
        Palette::new([
            ("00", Colour::rgb(0, 0, 0)),
            ("01", Colour::rgb(29, 43, 83)),
            ("05", Colour::rgb(255, 0, 0)),
            ("07", Colour::rgb(255, 241, 232)),
            ("11", Colour::rgb(0, 228, 54)),
            ("12", Colour::rgb(41, 173, 255)),
        ])
        .unwrap()
    }

    #[test]
    fn test_metric_parse_and_display() {
        assert_eq!("rgb".parse::<Metric>().unwrap(), Metric::Rgb);
        assert_eq!("lab".parse::<Metric>().unwrap(), Metric::Lab);
        assert!("LAB".parse::<Metric>().is_err());
        assert!("hsv".parse::<Metric>().is_err());
        assert_eq!(Metric::Rgb.to_string(), "rgb");
        assert_eq!(Metric::default(), Metric::Lab);
    }

    #[test]
    fn test_metric_spellings_agree() {
        use clap::ValueEnum;

        for (name, metric) in [("rgb", Metric::Rgb), ("lab", Metric::Lab)] {
            assert_eq!(name.parse::<Metric>().unwrap(), metric);
            assert_eq!(serde_yaml::from_str::<Metric>(name).unwrap(), metric);
            assert_eq!(<Metric as ValueEnum>::from_str(name, false).unwrap(), metric);
        }
        for name in ["cielab", "hsv"] {
            assert!(name.parse::<Metric>().is_err());
            assert!(serde_yaml::from_str::<Metric>(name).is_err());
            assert!(<Metric as ValueEnum>::from_str(name, false).is_err());
        }
    }

    #[test]
    fn test_exact_match_wins() {
        let palette = pico_like();
        for metric in [Metric::Rgb, Metric::Lab] {
            for (key, colour) in palette.colours() {
                assert_eq!(closest(colour, &palette, metric), key);
            }
        }
    }

    #[test]
    fn test_duplicate_colour_keeps_earlier_key() {
        let palette = Palette::new([
            ("a", Colour::rgb(10, 20, 30)),
            ("b", Colour::rgb(200, 0, 0)),
            ("c", Colour::rgb(200, 0, 0)),
        ])
        .unwrap();
        assert_eq!(closest(Colour::rgb(200, 0, 0), &palette, Metric::Rgb), "b");
        assert_eq!(closest(Colour::rgb(200, 0, 0), &palette, Metric::Lab), "b");
    }

    #[test]
    fn test_equidistant_prefers_first() {
        let palette = Palette::new([("lo", Colour::rgb(0, 0, 0)), ("hi", Colour::rgb(2, 0, 0))]).unwrap();
        assert_eq!(closest(Colour::rgb(1, 0, 0), &palette, Metric::Rgb), "lo");
    }

    #[test]
    fn test_single_entry_always_returned() {
        let palette = Palette::new([("only", Colour::rgb(90, 90, 90))]).unwrap();
        for colour in [Colour::BLACK, Colour::WHITE, Colour::rgb(255, 0, 255)] {
            assert_eq!(closest(colour, &palette, Metric::Rgb), "only");
            assert_eq!(closest(colour, &palette, Metric::Lab), "only");
        }
    }

    #[test]
    fn test_result_always_in_palette() {
        let palette = pico_like();
        for r in (0..=255).step_by(51) {
            for g in (0..=255).step_by(51) {
                for b in (0..=255).step_by(51) {
                    let key = closest(Colour::rgb(r, g, b), &palette, Metric::Lab);
                    assert!(palette.get(key).is_some());
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let palette = pico_like();
        let c = Colour::rgb(120, 64, 200);
        let first = closest(c, &palette, Metric::Lab);
        for _ in 0..10 {
            assert_eq!(closest(c, &palette, Metric::Lab), first);
        }
    }

    #[test]
    fn test_metrics_can_disagree() {
        // Dark saturated blue: raw RGB picks black, Lab picks the navy entry
        let palette = Palette::new([
            ("black", Colour::rgb(0, 0, 0)),
            ("navy", Colour::rgb(0, 0, 160)),
        ])
        .unwrap();
        let c = Colour::rgb(0, 0, 70);
        assert_eq!(closest(c, &palette, Metric::Rgb), "black");
        assert_eq!(closest(c, &palette, Metric::Lab), "navy");
    }

    #[test]
    fn test_matcher_agrees_with_closest() {
        let palette = pico_like();
        let mut matcher = Matcher::new(&palette, Metric::Lab);
        for c in [
            Colour::rgb(250, 10, 10),
            Colour::rgb(10, 200, 60),
            Colour::rgb(250, 10, 10),
            Colour::rgb(128, 128, 128),
        ] {
            assert_eq!(matcher.key(c), closest(c, &palette, Metric::Lab));
        }
        assert_eq!(matcher.colour(Colour::rgb(250, 10, 10)), Colour::rgb(255, 0, 0));
    }

    #[test]
    fn test_matcher_ignores_alpha() {
        let palette = pico_like();
        let mut matcher = Matcher::new(&palette, Metric::Rgb);
        assert_eq!(matcher.key(Colour::new(255, 0, 0, 0)), "05");
        assert_eq!(matcher.key(Colour::new(255, 0, 0, 255)), "05");
    }
}
