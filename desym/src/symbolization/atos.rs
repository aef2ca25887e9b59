//! Batched `atos` lookups
//!
//! `atos` accepts two address conventions, and a single call must use one:
//!
//! - runtime stack addresses together with `-l <load address>`
//! - addresses already shifted into the binary's own address space
//!   (`slide + stack - load`), without `-l`
//!
//! It prints one line per address, in input order.

use std::path::Path;

use log::{debug, info};

use super::tools::{Invocation, ToolRunner, Xcrun};
use crate::domain::{Address, DesymError};

/// Address convention of a lookup batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// Runtime stack addresses relative to the given load address
    LoadAddress(Address),
    /// Addresses already translated with the `__TEXT` slide
    SymbolAddresses,
}

/// The one resolver request made per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupBatch<'a> {
    pub object: &'a Path,
    pub architecture: &'a str,
    pub mode: LookupMode,
    pub addresses: Vec<Address>,
}

impl LookupBatch<'_> {
    #[must_use]
    pub fn invocation(&self, xcrun: &Xcrun) -> Invocation {
        let mut invocation = xcrun.tool("atos").arg("-o").arg(self.object);
        if let LookupMode::LoadAddress(load) = self.mode {
            invocation = invocation.arg("-l").arg(load.to_string());
        }
        invocation
            .arg("-arch")
            .arg(self.architecture)
            .args(self.addresses.iter().map(ToString::to_string))
    }

    /// Run the lookup and return one resolved line per address.
    ///
    /// # Errors
    /// Propagates tool failures and returns [`DesymError::CountMismatch`] if
    /// the number of output lines differs from the number of addresses.
    pub fn run(&self, runner: &dyn ToolRunner, xcrun: &Xcrun) -> Result<Vec<String>, DesymError> {
        info!("Resolving {} addresses ({:?})", self.addresses.len(), self.mode);

        let output = runner.run(&self.invocation(xcrun))?;
        let resolved: Vec<String> = output
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if resolved.len() != self.addresses.len() {
            return Err(DesymError::CountMismatch {
                expected: self.addresses.len(),
                found: resolved.len(),
            });
        }

        for (addr, line) in self.addresses.iter().zip(&resolved) {
            debug!("{addr} -> {line}");
        }
        Ok(resolved)
    }
}
