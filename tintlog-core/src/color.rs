//! Color values and the deterministic name-to-color hash.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A 24-bit color, displayed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    /// Parses a `#rrggbb` literal.
    pub fn parse(literal: &str) -> Result<Self, CoreError> {
        let hex = literal
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6)
            .ok_or_else(|| CoreError::InvalidColor(literal.to_string()))?;
        let value = u32::from_str_radix(hex, 16)
            .map_err(|_| CoreError::InvalidColor(literal.to_string()))?;
        Ok(Self::from_u32(value))
    }

    #[inline]
    pub fn from_u32(value: u32) -> Self {
        Rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    /// Builds a color from floating channel intensities.
    ///
    /// Channels are rounded and clamped into `0..=255`.
    pub fn from_channels(red: f64, green: f64, blue: f64) -> Self {
        Rgb(channel(red), channel(green), channel(blue))
    }

    pub fn red(self) -> u8 {
        self.0
    }

    pub fn green(self) -> u8 {
        self.1
    }

    pub fn blue(self) -> u8 {
        self.2
    }
}

fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// djb2 over UTF-16 code units (`hash * 33 + c`), wrapping at 32 bits.
pub fn djb2(input: &str) -> u32 {
    input.encode_utf16().fold(5381u32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(u32::from(unit))
    })
}

/// Tag color for a named logger. A pure function of the name.
pub fn name_color(name: &str) -> Rgb {
    Rgb::from_u32(djb2(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn displays_as_padded_hex() {
        assert_eq!(Rgb(0, 0x0a, 0xff).to_string(), "#000aff");
        assert_eq!(Rgb::parse("#3390ff").unwrap(), Rgb(0x33, 0x90, 0xff));
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(Rgb::parse("3390ff").is_err());
        assert!(Rgb::parse("#3390f").is_err());
        assert!(Rgb::parse("#zz90ff").is_err());
    }

    #[test]
    fn djb2_matches_reference_values() {
        assert_eq!(djb2(""), 5381);
        // 5381 * 33 + 'a'
        assert_eq!(djb2("a"), 177_670);
        assert_eq!(name_color("a"), Rgb(0x02, 0xb6, 0x06));
    }

    #[test]
    fn channels_clamp_and_round() {
        assert_eq!(Rgb::from_channels(-10.0, 62.5, 400.0), Rgb(0, 63, 255));
        assert_eq!(Rgb::from_channels(f64::NAN, 0.4, 0.0), Rgb(0, 0, 0));
    }

    proptest! {
        #[test]
        fn name_color_is_deterministic(name in ".{0,32}") {
            prop_assert_eq!(name_color(&name), name_color(&name));
        }
    }
}
