//! Pre-flight checks for desym
//!
//! Validates the command-line paths before anything is read or written.

use std::path::{Path, PathBuf};

use crate::domain::DesymError;

/// Check that `path` exists and return its absolute form.
///
/// # Errors
/// Returns [`DesymError::InputNotFound`] if the path does not exist.
pub fn check_input_exists(path: &Path) -> Result<PathBuf, DesymError> {
    if !path.exists() {
        return Err(DesymError::InputNotFound(path.to_path_buf()));
    }
    Ok(path.canonicalize()?)
}
