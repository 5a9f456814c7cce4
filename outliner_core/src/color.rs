// Copyright 2026 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint colors.
//!
//! [`Rgb`] is the only color type the walker handles. Layer-name directives
//! and command-line flags spell colors as hex strings (`#rgb` or `#rrggbb`,
//! the `#` is optional), which [`Rgb::from_str`](core::str::FromStr) parses.

use core::fmt;
use core::str::FromStr;

use crate::error::ParseError;

/// An 8-bit-per-channel RGB color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Opaque black, the default outline color.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Opaque white.
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    /// Creates a color from its channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Debug for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgb({self})")
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidColor(s.to_owned());
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !hex.is_ascii() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                // `#abc` is shorthand for `#aabbcc`.
                let expand = |i: usize| channel(&hex[i..=i]).map(|v| v * 0x11);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!("#ff8000".parse::<Rgb>(), Ok(Rgb::new(0xff, 0x80, 0x00)));
        assert_eq!("FF8000".parse::<Rgb>(), Ok(Rgb::new(0xff, 0x80, 0x00)));
        assert_eq!("#f80".parse::<Rgb>(), Ok(Rgb::new(0xff, 0x88, 0x00)));
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["", "#", "#12", "#12345", "#gggggg", "red", "#ffé"] {
            assert_eq!(
                bad.parse::<Rgb>(),
                Err(ParseError::InvalidColor(bad.to_owned())),
                "`{bad}` should not parse"
            );
        }
    }

    #[test]
    fn displays_as_lowercase_hex() {
        assert_eq!(Rgb::new(0xab, 0x01, 0xff).to_string(), "#ab01ff");
        assert_eq!(format!("{:?}", Rgb::BLACK), "Rgb(#000000)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb::WHITE).unwrap();
        assert_eq!(json, "\"#ffffff\"");
        let back: Rgb = serde_json::from_str("\"#0a0b0c\"").unwrap();
        assert_eq!(back, Rgb::new(0x0a, 0x0b, 0x0c));
    }
}
