//! Domain types providing compile-time safety and self-documentation
//!
//! Crash reports carry every address as `0x`-prefixed hex text. Parsing them
//! once into [`Address`] keeps the arithmetic typed and lets two spellings of
//! the same value (`0x100000000` and `0x0000000100000000`) compare equal.

use std::fmt;
use std::str::FromStr;

use super::errors::DesymError;

/// A 64-bit address as it appears in a crash report or tool output
///
/// Displays as lowercase `0x`-prefixed hex, which is the form `atos` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub u64);

impl Address {
    /// Parse a `0x`-prefixed hexadecimal address.
    ///
    /// # Errors
    /// Returns [`DesymError::InvalidAddress`] if the prefix is missing or the
    /// digits are not valid 64-bit hex.
    pub fn parse_hex(text: &str) -> Result<Self, DesymError> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .ok_or_else(|| DesymError::InvalidAddress(text.to_string()))?;
        if digits.is_empty() {
            return Err(DesymError::InvalidAddress(text.to_string()));
        }
        u64::from_str_radix(digits, 16)
            .map(Address)
            .map_err(|_| DesymError::InvalidAddress(text.to_string()))
    }
}

impl FromStr for Address {
    type Err = DesymError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for Address {
    fn from(addr: u64) -> Self {
        Address(addr)
    }
}
