//! `__TEXT` segment base address discovery
//!
//! The slide is the `vmaddr` of the `__TEXT` segment load command, read from
//! `otool -l` output:
//!
//! ```text
//! Load command 1
//!       cmd LC_SEGMENT_64
//!   cmdsize 712
//!   segname __TEXT
//!    vmaddr 0x0000000100000000
//! ```
//!
//! It is `0x4000` for most 32-bit binaries and `0x100000000` for 64-bit ones.

use std::path::Path;

use log::info;

use super::tools::{ToolRunner, Xcrun};
use crate::domain::{Address, DesymError};

/// Ask `otool` for the load commands of `object` and return the `__TEXT`
/// segment's `vmaddr`.
///
/// # Errors
/// Propagates tool failures and returns [`DesymError::SlideAddressNotFound`]
/// if the output has no `__TEXT` segment address.
pub fn discover_slide_address(
    runner: &dyn ToolRunner,
    xcrun: &Xcrun,
    object: &Path,
    architecture: &str,
) -> Result<Address, DesymError> {
    let invocation = xcrun.tool("otool").arg("-arch").arg(architecture).arg("-l").arg(object);
    let output = runner.run(&invocation)?;

    let token = find_text_vmaddr(&output)
        .ok_or_else(|| DesymError::SlideAddressNotFound(object.to_path_buf()))?;
    let slide = Address::parse_hex(token)?;

    info!("Slide address of {} ({architecture}): {slide}", object.display());
    Ok(slide)
}

/// Scan load command output for the `__TEXT` segment's `vmaddr` token.
fn find_text_vmaddr(output: &str) -> Option<&str> {
    let mut cmd_segment = false;
    let mut segname_text = false;

    for line in output.lines() {
        if line.contains("cmd LC_SEGMENT") {
            cmd_segment = true;
        }
        if cmd_segment && line.contains("segname __") && !line.contains("segname __TEXT") {
            cmd_segment = false;
        }
        if line.contains("segname __TEXT") {
            segname_text = true;
        }
        if cmd_segment && segname_text && line.contains("vmaddr") {
            return line.split_whitespace().nth(1);
        }
    }
    None
}
