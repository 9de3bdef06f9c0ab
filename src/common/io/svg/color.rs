//! Color mapping utilities for SVG choropleths.

use std::fmt;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rgb {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// HSL color: h in degrees, s and l in [0.0, 1.0].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Hsl {
    pub(crate) h: f64,
    pub(crate) s: f64,
    pub(crate) l: f64,
}

impl fmt::Display for Hsl {
    /// Format as CSS HSL:
    ///   hsl({h:.1},{s:.0}%,{l:.0}%)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // normalize hue into [0,360)
        let h = (self.h % 360.0 + 360.0) % 360.0;
        let s = (self.s * 100.0).clamp(0.0, 100.0);
        let l = (self.l * 100.0).clamp(0.0, 100.0);
        write!(f, "hsl({:.1},{:.0}%,{:.0}%)", h, s, l)
    }
}

const GOLDEN_ANGLE: f64 = 137.50776405;

/// Qualitative colour for a cluster label; neighbouring labels get distant hues.
pub(crate) fn golden_angle_color(index: usize) -> Hsl {
    Hsl { h: ((index as f64) * GOLDEN_ANGLE) % 360.0, s: 0.70, l: 0.55 }
}

/// Sequential ramp (viridis stops) for a value in [0.0, 1.0].
pub(crate) fn sequential_color(t: f64) -> Rgb {
    // Handle NaN / infinities: fall back to neutral gray.
    if !t.is_finite() { return Rgb { r: 150, g: 150, b: 150 } }

    const STOPS: &[Rgb] = &[
        Rgb { r:  68, g:   1, b:  84 },
        Rgb { r:  59, g:  82, b: 139 },
        Rgb { r:  33, g: 145, b: 140 },
        Rgb { r:  94, g: 201, b:  98 },
        Rgb { r: 253, g: 231, b:  37 },
    ];

    let x = t.clamp(0.0, 1.0) * (STOPS.len() - 1) as f64;
    let i = (x.floor() as usize).min(STOPS.len() - 2);
    let frac = x - i as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (STOPS[i], STOPS[i + 1]);
    Rgb { r: lerp(a.r, b.r), g: lerp(a.g, b.g), b: lerp(a.b, b.b) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_endpoints() {
        assert_eq!(sequential_color(0.0), Rgb { r: 68, g: 1, b: 84 });
        assert_eq!(sequential_color(1.0), Rgb { r: 253, g: 231, b: 37 });
        assert_eq!(sequential_color(7.0), sequential_color(1.0));
        assert_eq!(sequential_color(f64::NAN).to_string(), "rgb(150,150,150)");
    }

    #[test]
    fn golden_angle_hues_differ() {
        assert_eq!(golden_angle_color(0).to_string(), "hsl(0.0,70%,55%)");
        assert_eq!(golden_angle_color(1).to_string(), "hsl(137.5,70%,55%)");
    }
}
