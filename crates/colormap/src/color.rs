//! RGBA colors and CIELAB interpolation.

use serde::{Deserialize, Serialize};

/// Color value in RGBA format, serialized as `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Linear interpolation in RGBA space at `step / steps`.
    ///
    /// Channels are truncated toward zero, the way the tile service casts its
    /// expanded table to 8 bits. `steps == 0` returns `self`.
    pub fn blend(&self, other: &Rgba, step: u32, steps: u32) -> Rgba {
        if steps == 0 {
            return *self;
        }
        let step = step.min(steps);
        let mix = |a: u8, b: u8| {
            ((a as u32 * (steps - step) + b as u32 * step) / steps) as u8
        };
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Interpolation in CIELAB, so equal steps look equally different.
    ///
    /// Alpha is interpolated linearly. `t <= 0` and `t >= 1` return the
    /// endpoints unchanged.
    pub fn lerp_lab(&self, other: &Rgba, t: f64) -> Rgba {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }

        let a = Lab::from_rgb(self);
        let b = Lab::from_rgb(other);
        let mixed = Lab {
            l: a.l + (b.l - a.l) * t,
            a: a.a + (b.a - a.a) * t,
            b: a.b + (b.b - a.b) * t,
        };
        let alpha = ((self.a as f64) * (1.0 - t) + (other.a as f64) * t).round() as u8;
        mixed.to_rgb(alpha)
    }
}

// D65 reference white
const XN: f64 = 0.950_47;
const YN: f64 = 1.0;
const ZN: f64 = 1.088_83;

const EPSILON: f64 = 216.0 / 24389.0;
const KAPPA: f64 = 24389.0 / 27.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Lab {
    l: f64,
    a: f64,
    b: f64,
}

impl Lab {
    fn from_rgb(c: &Rgba) -> Self {
        let r = srgb_to_linear(c.r);
        let g = srgb_to_linear(c.g);
        let b = srgb_to_linear(c.b);

        let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
        let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b;
        let z = 0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b;

        let fx = lab_f(x / XN);
        let fy = lab_f(y / YN);
        let fz = lab_f(z / ZN);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    fn to_rgb(self, alpha: u8) -> Rgba {
        let fy = (self.l + 16.0) / 116.0;
        let fx = fy + self.a / 500.0;
        let fz = fy - self.b / 200.0;

        let x = lab_f_inv(fx) * XN;
        let yr = if self.l > KAPPA * EPSILON {
            fy.powi(3)
        } else {
            self.l / KAPPA
        };
        let y = yr * YN;
        let z = lab_f_inv(fz) * ZN;

        let r = 3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z;
        let g = -0.969_266_0 * x + 1.876_010_8 * y + 0.041_556_0 * z;
        let b = 0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z;

        Rgba::new(
            linear_to_srgb(r),
            linear_to_srgb(g),
            linear_to_srgb(b),
            alpha,
        )
    }
}

fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

fn lab_f_inv(f: f64) -> f64 {
    let cube = f.powi(3);
    if cube > EPSILON {
        cube
    } else {
        (116.0 * f - 16.0) / KAPPA
    }
}

#[inline]
fn srgb_to_linear(c: u8) -> f64 {
    let x = c as f64 / 255.0;
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f64) -> u8 {
    let c = c.clamp(0.0, 1.0);
    let y = if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (y.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex("#08519c"), Some(Rgba::opaque(8, 81, 156)));
        assert_eq!(Rgba::from_hex("ff000080"), Some(Rgba::new(255, 0, 0, 128)));
        assert_eq!(Rgba::from_hex("#fff"), None);
        assert_eq!(Rgba::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&Rgba::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json, "[1,2,3,4]");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::new(1, 2, 3, 4));
    }

    #[test]
    fn test_lab_round_trip_is_close() {
        for c in [
            Rgba::opaque(0, 0, 0),
            Rgba::opaque(255, 255, 255),
            Rgba::opaque(8, 81, 156),
            Rgba::opaque(253, 231, 37),
        ] {
            let back = Lab::from_rgb(&c).to_rgb(255);
            assert!((back.r as i16 - c.r as i16).abs() <= 1, "{:?} -> {:?}", c, back);
            assert!((back.g as i16 - c.g as i16).abs() <= 1, "{:?} -> {:?}", c, back);
            assert!((back.b as i16 - c.b as i16).abs() <= 1, "{:?} -> {:?}", c, back);
        }
    }

    #[test]
    fn test_lerp_lab_endpoints_exact() {
        let a = Rgba::opaque(239, 243, 255);
        let b = Rgba::opaque(8, 81, 156);
        assert_eq!(a.lerp_lab(&b, 0.0), a);
        assert_eq!(a.lerp_lab(&b, 1.0), b);
    }

    #[test]
    fn test_lerp_lab_midpoint_grey() {
        // Lab midpoint of black and white has L = 50, which is darker than
        // the RGB midpoint.
        let mid = Rgba::opaque(0, 0, 0).lerp_lab(&Rgba::opaque(255, 255, 255), 0.5);
        assert!((mid.r as i16 - mid.g as i16).abs() <= 1, "got {:?}", mid);
        assert!((mid.g as i16 - mid.b as i16).abs() <= 1, "got {:?}", mid);
        assert!(mid.r > 110 && mid.r < 125, "got {:?}", mid);
    }

    #[test]
    fn test_blend_rgb_truncates() {
        let mid = Rgba::new(0, 0, 0, 0).blend(&Rgba::new(200, 100, 51, 255), 1, 2);
        assert_eq!(mid, Rgba::new(100, 50, 25, 127));
    }

    #[test]
    fn test_blend_endpoints_and_zero_steps() {
        let a = Rgba::opaque(10, 20, 30);
        let b = Rgba::opaque(250, 240, 230);
        assert_eq!(a.blend(&b, 0, 7), a);
        assert_eq!(a.blend(&b, 7, 7), b);
        assert_eq!(a.blend(&b, 9, 7), b);
        assert_eq!(a.blend(&b, 3, 0), a);
    }
}
