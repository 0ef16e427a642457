//! Trichromatic radiance values.

use std::fmt;

use glam::Vec3;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Linear RGB radiance. Channels are non-negative and unbounded during
/// integration; clamping happens only at display conversion.
pub type Color = Vec3;

/// Whether every channel is zero.
#[inline]
pub fn is_black(c: Color) -> bool {
    c.x == 0.0 && c.y == 0.0 && c.z == 0.0
}

/// Colour as written in scene descriptions.
///
/// Accepts `[r, g, b]`, a single grey level, or a `"0xRRGGBB"` string whose
/// bytes map to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb(pub Color);

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Color {
        rgb.0
    }
}

impl Rgb {
    /// Parse a `0x`-prefixed hexadecimal `RRGGBB` string.
    pub fn from_hex(text: &str) -> Option<Rgb> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .or_else(|| text.strip_prefix('#'))?;
        if digits.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        let channel = |shift: u32| ((value >> shift) & 0xFF) as f32 / 255.0;
        Some(Rgb(Color::new(channel(16), channel(8), channel(0))))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.0.x, self.0.y, self.0.z].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RgbVisitor;

        impl<'de> Visitor<'de> for RgbVisitor {
            type Value = Rgb;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an [r, g, b] array, a grey level or a \"0xRRGGBB\" string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Rgb, E> {
                Ok(Rgb(Color::splat(v as f32)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Rgb, E> {
                Ok(Rgb(Color::splat(v as f32)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Rgb, E> {
                Ok(Rgb(Color::splat(v as f32)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Rgb, E> {
                Rgb::from_hex(v).ok_or_else(|| E::custom(format!("invalid hex colour {v:?}")))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Rgb, A::Error> {
                let mut channels = [0.0f32; 3];
                for (i, channel) in channels.iter_mut().enumerate() {
                    *channel = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                if seq.next_element::<f32>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }
                Ok(Rgb(Color::from(channels)))
            }
        }

        deserializer.deserialize_any(RgbVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colour() {
        let rgb = Rgb::from_hex("0xFF8000").unwrap();
        assert_eq!(rgb.0, Color::new(1.0, 128.0 / 255.0, 0.0));
        assert!(Rgb::from_hex("FF8000").is_none());
        assert!(Rgb::from_hex("0xFF80").is_none());
    }

    #[test]
    fn test_deserialize_forms() {
        let array: Rgb = serde_json::from_str("[0.5, 0.25, 1.0]").unwrap();
        assert_eq!(array.0, Color::new(0.5, 0.25, 1.0));

        let grey: Rgb = serde_json::from_str("0.75").unwrap();
        assert_eq!(grey.0, Color::splat(0.75));

        let hex: Rgb = serde_json::from_str("\"0x00FF00\"").unwrap();
        assert_eq!(hex.0, Color::new(0.0, 1.0, 0.0));

        assert!(serde_json::from_str::<Rgb>("[1.0, 2.0]").is_err());
        assert!(serde_json::from_str::<Rgb>("[1.0, 2.0, 3.0, 4.0]").is_err());
    }

    #[test]
    fn test_is_black() {
        assert!(is_black(Color::ZERO));
        assert!(!is_black(Color::new(0.0, 1e-6, 0.0)));
    }
}
