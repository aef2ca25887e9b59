//! Address resolution driver
//!
//! Collects the raw frames of the crashed binary, turns them into a single
//! `atos` batch and threads the results back onto the original lines.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::{debug, info};

use super::atos::{LookupBatch, LookupMode};
use super::slide::discover_slide_address;
use super::tools::{ToolRunner, Xcrun};
use crate::domain::{Address, DesymError};
use crate::report::{BinaryImageInfo, FrameKind, FrameLine, FramePatterns};

/// Original frame line text mapped to its rewritten form
pub type ResolutionMap = HashMap<String, String>;

/// Compute `slide + stack - load`.
///
/// # Errors
/// Returns [`DesymError::AddressOutOfRange`] if the stack address lies below
/// the load address or the sum overflows 64 bits.
pub fn symbol_address(
    slide: Address,
    stack: Address,
    load: Address,
) -> Result<Address, DesymError> {
    stack
        .0
        .checked_sub(load.0)
        .and_then(|offset| offset.checked_add(slide.0))
        .map(Address)
        .ok_or(DesymError::AddressOutOfRange { stack, load, slide })
}

/// Distinct raw frame lines of the binary, in first-seen order.
///
/// # Errors
/// Returns [`DesymError::InvalidAddress`] for frames whose numbers do not fit
/// in 64 bits.
pub fn collect_frames<'a>(
    report: &'a str,
    patterns: &FramePatterns,
) -> Result<Vec<FrameLine<'a>>, DesymError> {
    let mut seen = HashSet::new();
    let mut frames = Vec::new();
    for line in report.lines() {
        if let Some(frame) = patterns.classify(line)? {
            if seen.insert(line) {
                debug!("Frame {:?}: {line}", frame.kind);
                frames.push(frame);
            }
        }
    }
    Ok(frames)
}

/// Drives the resolution of every frame of one binary image
pub struct AddressResolver<'a> {
    runner: &'a dyn ToolRunner,
    xcrun: &'a Xcrun,
    object: &'a Path,
    image: &'a BinaryImageInfo,
}

impl<'a> AddressResolver<'a> {
    pub fn new(
        runner: &'a dyn ToolRunner,
        xcrun: &'a Xcrun,
        object: &'a Path,
        image: &'a BinaryImageInfo,
    ) -> Self {
        Self { runner, xcrun, object, image }
    }

    /// Build the resolution map for `report`.
    ///
    /// Makes at most one `otool` call and at most one `atos` call.
    ///
    /// # Errors
    /// Returns [`DesymError::LoadAddressMismatch`] if an offset frame records
    /// a different load address than the binary image, and propagates slide
    /// discovery, arithmetic and lookup failures.
    pub fn resolve(
        &self,
        report: &str,
        patterns: &FramePatterns,
    ) -> Result<ResolutionMap, DesymError> {
        let frames = collect_frames(report, patterns)?;
        if frames.is_empty() {
            info!("No unresolved frames for {}", self.image.binary_name);
            return Ok(ResolutionMap::new());
        }

        self.check_load_addresses(&frames)?;
        let batch = self.plan(&frames)?;
        // One address per frame, so the count check in `run` keeps them aligned
        let resolved = batch.run(self.runner, self.xcrun)?;

        Ok(frames
            .iter()
            .zip(resolved)
            .map(|(frame, symbol)| (frame.text.to_string(), frame.replacement(&symbol)))
            .collect())
    }

    /// A report must not mix images loaded at different addresses under one name.
    fn check_load_addresses(&self, frames: &[FrameLine<'_>]) -> Result<(), DesymError> {
        for frame in frames {
            if let FrameKind::Offset { load, .. } = frame.kind {
                if load != self.image.load_address {
                    return Err(DesymError::LoadAddressMismatch {
                        expected: self.image.load_address,
                        found: load,
                        line: frame.text.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Pick the batch mode and compute the address list.
    ///
    /// Decimal frames carry no load address of their own, so their presence
    /// switches the whole batch to slide-translated symbol addresses.
    fn plan(&self, frames: &[FrameLine<'_>]) -> Result<LookupBatch<'a>, DesymError> {
        let load = self.image.load_address;
        let has_decimal = frames.iter().any(|f| matches!(f.kind, FrameKind::Decimal { .. }));

        let (mode, addresses) = if has_decimal {
            let slide = discover_slide_address(
                self.runner,
                self.xcrun,
                self.object,
                &self.image.architecture,
            )?;
            let addresses = frames
                .iter()
                .map(|f| symbol_address(slide, f.stack, load))
                .collect::<Result<Vec<_>, _>>()?;
            (LookupMode::SymbolAddresses, addresses)
        } else {
            (LookupMode::LoadAddress(load), frames.iter().map(|f| f.stack).collect())
        };

        Ok(LookupBatch {
            object: self.object,
            architecture: &self.image.architecture,
            mode,
            addresses,
        })
    }
}
