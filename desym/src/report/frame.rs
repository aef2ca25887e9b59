//! Stack frame classification
//!
//! Unsymbolicated frames of the crashed binary come in three shapes:
//!
//! ```text
//! 2   MyApp   0x00000001003dc6d8 0x100000000 + 4048600    (offset)
//! 2   MyApp   0x00000001003dc6d8 MyApp + 4048600          (decimal)
//! 2   MyApp   0x00000001003dc6d8                          (bare)
//! ```
//!
//! Frames that already carry a symbol (`funcName (in MyApp) + 10`) match none
//! of these and are left alone, which makes a second run a no-op.

use log::debug;
use regex::Regex;

use crate::domain::{Address, DesymError};

/// Shape of a raw frame line, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Explicit `<load address> + <offset>` suffix
    Offset { load: Address, offset: u64 },
    /// Any single token followed by `+ <offset>`
    Decimal { offset: u64 },
    /// Stack address with nothing after it
    Bare,
}

/// A classified frame line borrowed from the report text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLine<'a> {
    /// The full original line, used as the rewrite key
    pub text: &'a str,
    /// Frame index, binary name, stack address and trailing whitespace
    pub prefix: &'a str,
    pub stack: Address,
    pub kind: FrameKind,
}

impl FrameLine<'_> {
    /// Build the rewritten line from the resolver's output for this frame.
    #[must_use]
    pub fn replacement(&self, resolved: &str) -> String {
        if self.prefix.ends_with(char::is_whitespace) {
            format!("{}{resolved}", self.prefix)
        } else {
            format!("{} {resolved}", self.prefix)
        }
    }
}

/// Frame-matching patterns compiled for one binary name
#[derive(Debug, Clone)]
pub struct FramePatterns {
    prefix: Regex,
    offset: Regex,
    decimal: Regex,
}

impl FramePatterns {
    /// Compile the patterns for `binary_name`.
    ///
    /// # Errors
    /// Returns [`DesymError::Pattern`] if a pattern fails to compile.
    pub fn new(binary_name: &str) -> Result<Self, DesymError> {
        let head = format!(r"^\d+\s+{}\s+(0x[0-9a-f]+)", regex::escape(binary_name));
        Ok(Self {
            prefix: Regex::new(&format!(r"{head}(?:\s+|$)"))?,
            offset: Regex::new(&format!(r"{head}\s+(0x[0-9a-f]+)\s+\+\s+(\d+)"))?,
            decimal: Regex::new(&format!(r"{head}\s+\S+\s+\+\s+(\d+)\s*$"))?,
        })
    }

    /// Classify a report line.
    ///
    /// Returns `Ok(None)` for lines that are not raw frames of this binary.
    ///
    /// # Errors
    /// Returns [`DesymError::InvalidAddress`] if a matched address or offset
    /// does not fit in 64 bits.
    pub fn classify<'a>(&self, line: &'a str) -> Result<Option<FrameLine<'a>>, DesymError> {
        let Some(head) = self.prefix.captures(line) else {
            return Ok(None);
        };
        let prefix = &line[..head.get(0).map_or(0, |m| m.end())];
        let stack = Address::parse_hex(&head[1])?;

        // Group 1 of every pattern is the stack address
        let kind = if let Some(caps) = self.offset.captures(line) {
            FrameKind::Offset {
                load: Address::parse_hex(&caps[2])?,
                offset: parse_offset(&caps[3])?,
            }
        } else if let Some(caps) = self.decimal.captures(line) {
            FrameKind::Decimal { offset: parse_offset(&caps[2])? }
        } else if line[prefix.len()..].trim().is_empty() {
            FrameKind::Bare
        } else {
            debug!("Skipping symbolicated frame: {line}");
            return Ok(None);
        };

        Ok(Some(FrameLine { text: line, prefix, stack, kind }))
    }
}

fn parse_offset(digits: &str) -> Result<u64, DesymError> {
    digits.parse().map_err(|_| DesymError::InvalidAddress(digits.to_string()))
}
