use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub [u8; 4]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("colour `{0}` must start with '#'")]
    MissingHash(String),
    #[error("colour `{0}` must have 6 or 8 hex digits")]
    InvalidLength(String),
    #[error("colour `{0}` contains a non-hex digit")]
    InvalidDigit(String),
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub const fn rgba(self) -> [u8; 4] {
        self.0
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(raw: &str) -> Result<Self, ColorParseError> {
        let trimmed = raw.trim();
        let Some(digits) = trimmed.strip_prefix('#') else {
            return Err(ColorParseError::MissingHash(raw.to_string()));
        };
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorParseError::InvalidLength(raw.to_string()));
        }
        if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(raw.to_string()));
        }

        let mut channels = [255u8; 4];
        for (slot, start) in channels.iter_mut().zip((0..digits.len()).step_by(2)) {
            let pair = &digits[start..start + 2];
            *slot = u8::from_str_radix(pair, 16)
                .map_err(|_| ColorParseError::InvalidDigit(raw.to_string()))?;
        }
        Ok(Self(channels))
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::from_hex(raw)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::from_hex(&raw)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_hex_as_opaque() {
        let color = Color::from_hex("#ccff11").expect("colour");
        assert_eq!(color.rgba(), [0xcc, 0xff, 0x11, 0xff]);
    }

    #[test]
    fn parses_eight_digit_hex_with_alpha() {
        let color: Color = "#66330080".parse().expect("colour");
        assert_eq!(color.rgba(), [0x66, 0x33, 0x00, 0x80]);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(
            Color::from_hex("ccff11"),
            Err(ColorParseError::MissingHash(_))
        ));
        assert!(matches!(
            Color::from_hex("#ccf"),
            Err(ColorParseError::InvalidLength(_))
        ));
        assert!(matches!(
            Color::from_hex("#ccgg11"),
            Err(ColorParseError::InvalidDigit(_))
        ));
    }

    #[test]
    fn display_matches_parsed_input() {
        assert_eq!(Color::rgb(0, 255, 0).to_string(), "#00ff00");
        assert_eq!(Color([1, 2, 3, 4]).to_string(), "#01020304");
    }
}
