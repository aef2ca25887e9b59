//! Domain model for desym
//!
//! This module contains core domain types and errors that provide:
//! - Typed addresses instead of hex strings
//! - Structured error handling

pub mod errors;
pub mod types;

pub use errors::DesymError;
pub use types::Address;
