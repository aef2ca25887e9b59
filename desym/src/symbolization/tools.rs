//! External tool invocation
//!
//! `atos`, `otool`, `xcode-select` and `symbolicatecrash` are all opaque
//! command-line processes. Every call goes through [`ToolRunner`] so the
//! pipeline can be driven by a stub in tests and on machines without Xcode.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::domain::DesymError;

/// A fully described external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Short tool name used in log and error messages
    pub name: String,
    pub program: OsString,
    pub args: Vec<OsString>,
    pub envs: Vec<(OsString, OsString)>,
}

impl Invocation {
    pub fn new(name: &str, program: impl Into<OsString>) -> Self {
        Self { name: name.to_string(), program: program.into(), args: Vec::new(), envs: Vec::new() }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs.push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs external tools and captures their standard output
pub trait ToolRunner {
    /// Run `invocation` to completion.
    ///
    /// # Errors
    /// Implementations return [`DesymError::ToolUnavailable`] when the
    /// program cannot be started and [`DesymError::ToolFailed`] on a
    /// non-zero exit.
    fn run(&self, invocation: &Invocation) -> Result<String, DesymError>;
}

/// [`ToolRunner`] backed by `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<String, DesymError> {
        debug!("Running {invocation}");

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.envs.iter().map(|(k, v)| (k, v)))
            .output()
            .map_err(|source| DesymError::ToolUnavailable {
                tool: invocation.name.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DesymError::ToolFailed {
                tool: invocation.name.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Launcher for developer tools that live behind `xcrun`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xcrun {
    program: OsString,
}

impl Xcrun {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self { program: program.as_ref().as_os_str().to_os_string() }
    }

    /// Start an invocation of `xcrun <tool>`.
    #[must_use]
    pub fn tool(&self, tool: &str) -> Invocation {
        Invocation::new(tool, &self.program).arg(tool)
    }
}

impl Default for Xcrun {
    fn default() -> Self {
        Self::new("xcrun")
    }
}
