//! Color types
//!
//! [`Color`] is the general RGBA value used in configuration. [`Rgb`] is the
//! packed three-float form stored per particle and uploaded as a vertex
//! attribute.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color (linear space)
///
/// Serializes as a `#rrggbb` or `#rrggbbaa` hex string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional)
    pub fn parse_hex(s: &str) -> Result<Self, ParseColorError> {
        let digits = s.trim().trim_start_matches('#');
        let err = || ParseColorError(s.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| -> Result<f32, ParseColorError> {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| err())
        };
        match digits.len() {
            3 => {
                let nibble = |i: usize| -> Result<f32, ParseColorError> {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|v| (v * 17) as f32 / 255.0)
                        .map_err(|_| err())
                };
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(err()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque
    pub fn to_hex_string(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if byte(self.a) == 255 {
            format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Drop alpha for per-vertex storage
    pub fn to_rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex_string()
    }
}

/// Error returned when a color string is not valid hex
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color: {:?}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

/// Packed RGB triple, one per particle
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for Rgb {
    fn from(color: Color) -> Self {
        color.to_rgb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_matches_parse() {
        let a = Color::from_hex(0x4285f4);
        let b = Color::parse_hex("#4285f4").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_short_and_alpha_forms() {
        assert_eq!(Color::parse_hex("#fff").unwrap(), Color::WHITE);
        let c = Color::parse_hex("ff000080").unwrap();
        assert_eq!(c.r, 1.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Color::parse_hex("#12345").is_err());
        assert!(Color::parse_hex("#zzzzzz").is_err());
        assert!(Color::parse_hex("").is_err());
    }

    #[test]
    fn test_hex_string_drops_opaque_alpha() {
        assert_eq!(Color::from_hex(0xea4335).to_hex_string(), "#ea4335");
        assert_eq!(Color::RED.with_alpha(0.0).to_hex_string(), "#ff000000");
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let json = serde_json::to_string(&vec![Color::from_hex(0x34a853)]).unwrap();
        assert_eq!(json, r##"["#34a853"]"##);
        let back: Vec<Color> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0], Color::from_hex(0x34a853));
        assert!(serde_json::from_str::<Color>(r#""nope""#).is_err());
    }

    #[test]
    fn test_lerp_clamps() {
        let c = Color::lerp(&Color::BLACK, &Color::WHITE, 2.0);
        assert_eq!(c, Color::WHITE);
    }
}
