//! End-to-end desymbolication of one crash report
//!
//! Nothing is written until every stage has succeeded, so any fatal error
//! leaves the report untouched.

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::config::Config;
use crate::domain::DesymError;
use crate::preflight::check_input_exists;
use crate::preresolve::pre_resolve;
use crate::report::{scan_report, FramePatterns};
use crate::rewrite::{rewrite_lines, write_with_backup};
use crate::symbolization::{resolve_object_path, AddressResolver, ToolRunner, Xcrun};

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Distinct frame lines rewritten by `atos` results
    pub resolved_frames: usize,
    /// Whether the `symbolicatecrash` pass supplied the report text
    pub pre_resolved: bool,
    /// Backup of the original report, `None` if the report was unchanged
    pub backup: Option<PathBuf>,
}

/// Desymbolicate `config.crash_report` in place.
///
/// # Errors
/// Returns the first fatal [`DesymError`]; the report is not modified in
/// that case.
pub fn desymbolicate(config: &Config, runner: &dyn ToolRunner) -> Result<Outcome, DesymError> {
    let report_path = check_input_exists(&config.crash_report)?;
    let symbols = check_input_exists(&config.symbols)?;

    let original = fs::read(&report_path)?;
    // Non-UTF-8 reports are rejected before any tool runs
    let raw = std::str::from_utf8(&original)
        .map_err(|source| DesymError::NotUtf8 { path: report_path.clone(), source })?;

    let pre_resolved = pre_resolve(runner, config, &report_path, &symbols);
    let text = pre_resolved.as_deref().unwrap_or(raw);

    let image = scan_report(text)?;
    let patterns = FramePatterns::new(&image.binary_name)?;
    let object = resolve_object_path(&symbols, &image.binary_name)?;
    let xcrun = Xcrun::new(&config.xcrun);

    let map = AddressResolver::new(runner, &xcrun, &object, &image).resolve(text, &patterns)?;
    let rewritten = rewrite_lines(text, &map);

    let backup = if rewritten.as_bytes() == original.as_slice() {
        info!("{} is already desymbolicated", report_path.display());
        None
    } else {
        Some(write_with_backup(&report_path, &original, &rewritten)?)
    };

    Ok(Outcome { resolved_frames: map.len(), pre_resolved: pre_resolved.is_some(), backup })
}
