//! Optional `symbolicatecrash` pass
//!
//! When the symbols are a dSYM bundle, Xcode's `symbolicatecrash` script can
//! resolve the whole report, including system frames. Its output replaces the
//! in-memory report text; frames it leaves raw are picked up by `atos`
//! afterwards. Every failure here is a warning, never fatal.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::Config;
use crate::domain::DesymError;
use crate::symbolization::{dsym_bundle, Invocation, ToolRunner};

/// `symbolicatecrash` locations relative to the developer directory, newest
/// Xcode layout first
const SYMBOLICATECRASH_LOCATIONS: [&str; 2] = [
    "../SharedFrameworks/DVTFoundation.framework/Versions/A/Resources/symbolicatecrash",
    "Platforms/iPhoneOS.platform/Developer/Library/PrivateFrameworks/DTDeviceKitBase.framework/Versions/A/Resources/symbolicatecrash",
];

/// Resolve the Xcode developer directory.
///
/// # Errors
/// Propagates `xcode-select` failures and returns
/// [`DesymError::ToolchainNotFound`] if it prints nothing.
pub fn developer_dir(
    runner: &dyn ToolRunner,
    configured: Option<&Path>,
) -> Result<PathBuf, DesymError> {
    if let Some(dir) = configured {
        return Ok(dir.to_path_buf());
    }

    let output = runner.run(&Invocation::new("xcode-select", "xcode-select").arg("-p"))?;
    let dir = output.trim();
    if dir.is_empty() {
        return Err(DesymError::ToolchainNotFound("xcode-select -p printed nothing".to_string()));
    }
    Ok(PathBuf::from(dir))
}

/// Locate `symbolicatecrash` inside a developer directory.
///
/// # Errors
/// Returns [`DesymError::ToolchainNotFound`] if no known location exists.
pub fn find_symbolicatecrash(developer_dir: &Path) -> Result<PathBuf, DesymError> {
    SYMBOLICATECRASH_LOCATIONS
        .iter()
        .map(|rel| developer_dir.join(rel))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            DesymError::ToolchainNotFound(format!(
                "symbolicatecrash not found under {}",
                developer_dir.display()
            ))
        })
}

/// Run `symbolicatecrash` on `report` against `bundle` and return its output.
///
/// # Errors
/// Propagates toolchain discovery and tool failures.
pub fn symbolicate_report(
    runner: &dyn ToolRunner,
    config: &Config,
    report: &Path,
    bundle: &Path,
) -> Result<String, DesymError> {
    let developer_dir = developer_dir(runner, config.developer_dir.as_deref())?;
    let tool = find_symbolicatecrash(&developer_dir)?;
    let invocation = Invocation::new("symbolicatecrash", tool)
        .arg(report)
        .arg(bundle)
        .env("DEVELOPER_DIR", &developer_dir);
    runner.run(&invocation)
}

/// Try the `symbolicatecrash` pass, returning the resolved report text.
///
/// Returns `None` when the pass is disabled, the symbols are not a dSYM
/// bundle, or the tool fails.
pub fn pre_resolve(
    runner: &dyn ToolRunner,
    config: &Config,
    report: &Path,
    symbols: &Path,
) -> Option<String> {
    if !config.pre_resolve {
        return None;
    }
    let Some(bundle) = dsym_bundle(symbols) else {
        debug!("{} is not a dSYM bundle, skipping symbolicatecrash", symbols.display());
        return None;
    };

    match symbolicate_report(runner, config, report, bundle) {
        Ok(text) if !text.trim().is_empty() => {
            info!("symbolicatecrash resolved {}", report.display());
            Some(text)
        }
        Ok(_) => {
            warn!("symbolicatecrash produced no output, continuing with atos only");
            None
        }
        Err(e) => {
            warn!("symbolicatecrash unavailable, continuing with atos only: {e}");
            None
        }
    }
}
