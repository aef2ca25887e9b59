//! Binary image descriptor extraction
//!
//! A crash report lists every loaded image under a `Binary Images:` header.
//! The first entry is the crashed application itself:
//!
//! ```text
//! Binary Images:
//! 0x100000000 - 0x100ffffff +MyApp arm64  <9b2e...c41> /var/containers/Bundle/Application/.../MyApp.app/MyApp
//! ```

use log::{debug, info};

use crate::domain::{Address, DesymError};

/// Header that precedes the binary image list
pub const BINARY_IMAGES_MARKER: &str = "Binary Images:";

/// Number of fields in a descriptor once the `-` separator is dropped
const DESCRIPTOR_FIELDS: usize = 6;

/// Metadata of the crashed binary, taken from the first image descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImageInfo {
    pub load_address: Address,
    pub end_address: Address,
    pub binary_name: String,
    pub architecture: String,
    pub build_uuid: String,
    pub binary_path: String,
}

/// Scan a crash report for the application's binary image descriptor.
///
/// # Errors
/// Returns [`DesymError::BinaryImageNotFound`] if there is no descriptor line
/// or it has fewer than six fields, and [`DesymError::MalformedDescriptor`] if
/// its address range is not hex.
pub fn scan_report(report: &str) -> Result<BinaryImageInfo, DesymError> {
    let line = find_descriptor_line(report).ok_or(DesymError::BinaryImageNotFound)?;
    debug!("Binary image descriptor: {}", line.trim_end());

    let info = parse_descriptor(line)?;
    info!(
        "Binary image {} ({}) loaded at {}, uuid {}",
        info.binary_name, info.architecture, info.load_address, info.build_uuid
    );
    Ok(info)
}

/// Return the line right after the last `Binary Images:` marker.
fn find_descriptor_line(report: &str) -> Option<&str> {
    let mut descriptor = None;
    let mut lines = report.lines();
    while let Some(line) = lines.next() {
        if line.contains(BINARY_IMAGES_MARKER) {
            descriptor = lines.next();
        }
    }
    descriptor
}

/// Parse a descriptor line into its six fields.
///
/// Tokens beyond the sixth belong to the binary path, which may contain
/// spaces.
fn parse_descriptor(line: &str) -> Result<BinaryImageInfo, DesymError> {
    let tokens: Vec<&str> = line.split_whitespace().filter(|t| *t != "-").collect();
    if tokens.len() < DESCRIPTOR_FIELDS {
        return Err(DesymError::BinaryImageNotFound);
    }

    let malformed = |reason: &str| DesymError::MalformedDescriptor {
        line: line.trim_end().to_string(),
        reason: reason.to_string(),
    };

    let load_address = Address::parse_hex(tokens[0]).map_err(|_| malformed("load address"))?;
    let end_address = Address::parse_hex(tokens[1]).map_err(|_| malformed("end address"))?;

    // A leading `+` marks the image as part of the app bundle
    let binary_name: String = tokens[2].chars().filter(|c| *c != '+').collect();
    if binary_name.is_empty() {
        return Err(malformed("binary name"));
    }

    let uuid = tokens[4];
    let build_uuid = uuid
        .strip_prefix('<')
        .and_then(|u| u.strip_suffix('>'))
        .unwrap_or(uuid)
        .to_string();

    Ok(BinaryImageInfo {
        load_address,
        end_address,
        binary_name,
        architecture: tokens[3].to_string(),
        build_uuid,
        binary_path: tokens[DESCRIPTOR_FIELDS - 1..].join(" "),
    })
}
