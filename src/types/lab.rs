//! CIE L*a*b* coordinates for perceptual colour matching.

use palette::{LinSrgb, Srgb};

use super::Colour;

/// D65 reference white, scaled to Y = 100.
const REF_WHITE: [f64; 3] = [95.047, 100.0, 108.883];

/// Below this the cube root is replaced by a linear segment.
const EPSILON: f64 = 0.008856;

/// A colour in CIE L*a*b* space (D65).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Convert an 8-bit sRGB colour. Alpha is ignored.
    pub fn from_colour(colour: Colour) -> Self {
        let linear: LinSrgb<f64> = Srgb::new(
            colour.r as f64 / 255.0,
            colour.g as f64 / 255.0,
            colour.b as f64 / 255.0,
        )
        .into_linear();
        let (r, g, b) = (linear.red, linear.green, linear.blue);

        let x = (r * 0.4124 + g * 0.3576 + b * 0.1805) * 100.0;
        let y = (r * 0.2126 + g * 0.7152 + b * 0.0722) * 100.0;
        let z = (r * 0.0193 + g * 0.1192 + b * 0.9505) * 100.0;

        let fx = pivot(x / REF_WHITE[0]);
        let fy = pivot(y / REF_WHITE[1]);
        let fz = pivot(z / REF_WHITE[2]);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Squared Euclidean distance, summed in L, a, b order.
    pub fn distance_sq(&self, other: &Lab) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }
}

impl From<Colour> for Lab {
    fn from(colour: Colour) -> Self {
        Self::from_colour(colour)
    }
}

fn pivot(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}
