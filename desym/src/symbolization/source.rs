//! Symbol source resolution
//!
//! Users may point at a dSYM bundle, an `.app` bundle or the Mach-O file
//! itself. `atos` and `otool` need the Mach-O file.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::domain::DesymError;

const DSYM_DWARF_DIR: &str = "Contents/Resources/DWARF";

/// Return the enclosing `.dSYM` bundle of `path`, if any.
#[must_use]
pub fn dsym_bundle(path: &Path) -> Option<&Path> {
    path.ancestors().find(|p| has_extension(p, "dSYM"))
}

/// Map a user-supplied symbol path to the object file for `binary_name`.
///
/// # Errors
/// Returns [`DesymError::SymbolSourceNotFound`] if a bundle holds no
/// matching object file.
pub fn resolve_object_path(symbols: &Path, binary_name: &str) -> Result<PathBuf, DesymError> {
    if !symbols.is_dir() {
        return Ok(symbols.to_path_buf());
    }

    let not_found = || DesymError::SymbolSourceNotFound {
        bundle: symbols.to_path_buf(),
        binary: binary_name.to_string(),
    };

    let object = if has_extension(symbols, "dSYM") {
        let dwarf = symbols.join(DSYM_DWARF_DIR);
        let named = dwarf.join(binary_name);
        if named.is_file() {
            named
        } else {
            sole_file(&dwarf).ok_or_else(not_found)?
        }
    } else if has_extension(symbols, "app") {
        let named = symbols.join(binary_name);
        if !named.is_file() {
            return Err(not_found());
        }
        named
    } else {
        symbols.to_path_buf()
    };

    debug!("Symbol object for {binary_name}: {}", object.display());
    Ok(object)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

/// The only regular file in `dir`.
fn sole_file(dir: &Path) -> Option<PathBuf> {
    let mut files = fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file());
    let first = files.next()?;
    files.next().is_none().then_some(first)
}
