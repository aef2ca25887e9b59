//! Structured error types for desym
//!
//! Using thiserror for automatic Display implementation and error chaining.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::types::Address;

#[derive(Error, Debug)]
pub enum DesymError {
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("{} is not valid UTF-8 text: {source}", .path.display())]
    NotUtf8 {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Binary image not found: no descriptor line follows \"Binary Images:\"")]
    BinaryImageNotFound,

    #[error("Malformed binary image descriptor ({reason}): {line}")]
    MalformedDescriptor { line: String, reason: String },

    #[error("Invalid hex address: {0}")]
    InvalidAddress(String),

    #[error("Load address mismatch: report declares {expected}, frame records {found}: {line}")]
    LoadAddressMismatch { expected: Address, found: Address, line: String },

    #[error("Stack address {stack} is outside the image loaded at {load} (slide {slide})")]
    AddressOutOfRange { stack: Address, load: Address, slide: Address },

    #[error("Cannot determine slide address of {}", .0.display())]
    SlideAddressNotFound(PathBuf),

    #[error(
        "Desymbolication count mismatch: submitted {expected} addresses, resolver returned {found} lines"
    )]
    CountMismatch { expected: usize, found: usize },

    #[error("Cannot locate an object file for {binary} inside {}", .bundle.display())]
    SymbolSourceNotFound { bundle: PathBuf, binary: String },

    #[error("Failed to run {tool}: {source}")]
    ToolUnavailable {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed { tool: String, status: String, stderr: String },

    #[error("Toolchain not found: {0}")]
    ToolchainNotFound(String),

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl DesymError {
    /// True for errors caused by the paths handed to the tool rather than by
    /// the report contents or an external tool.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, DesymError::InputNotFound(_) | DesymError::SymbolSourceNotFound { .. })
    }
}
