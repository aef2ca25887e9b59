//! Crash report rewriting
//!
//! Pure substitution keyed by exact line text. The original bytes are saved
//! next to the report before it is overwritten.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::domain::DesymError;
use crate::symbolization::ResolutionMap;

/// Suffix appended to the report path for the backup copy
pub const BACKUP_SUFFIX: &str = ".dbak";

/// `report.crash` -> `report.crash.dbak`
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Apply `map` to every line of `report`.
///
/// Mapped lines are replaced, all others keep their text with trailing
/// whitespace trimmed. Every output line ends with `\n`.
#[must_use]
pub fn rewrite_lines(report: &str, map: &ResolutionMap) -> String {
    let mut output = String::with_capacity(report.len());
    for line in report.lines() {
        match map.get(line) {
            Some(replacement) => output.push_str(replacement),
            None => output.push_str(line.trim_end()),
        }
        output.push('\n');
    }
    output
}

/// Save `original` to the backup path, then overwrite `path` with `rewritten`.
///
/// Returns the backup path.
///
/// # Errors
/// Returns [`DesymError::Io`] if either write fails. The report is not
/// touched unless the backup was written.
pub fn write_with_backup(
    path: &Path,
    original: &[u8],
    rewritten: &str,
) -> Result<PathBuf, DesymError> {
    let backup = backup_path(path);
    fs::write(&backup, original)?;
    fs::write(path, rewritten)?;
    info!("Rewrote {} (backup: {})", path.display(), backup.display());
    Ok(backup)
}
