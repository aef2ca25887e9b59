//! Crash report parsing
//!
//! - **`scanner`**: finds the crashed binary's image descriptor
//!   (load address, name, architecture, uuid)
//! - **`frame`**: classifies backtrace lines of that binary into
//!   offset, decimal and bare frames

pub mod frame;
pub mod scanner;

pub use frame::{FrameKind, FrameLine, FramePatterns};
pub use scanner::{scan_report, BinaryImageInfo, BINARY_IMAGES_MARKER};
