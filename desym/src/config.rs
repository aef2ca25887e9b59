//! Run configuration
//!
//! Everything the pipeline reads from the environment arrives here first,
//! so library code never consults process-wide state.

use std::path::PathBuf;

/// Settings for one desymbolication run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Crash report to rewrite in place
    pub crash_report: PathBuf,
    /// dSYM bundle, `.app` bundle or Mach-O binary
    pub symbols: PathBuf,
    /// Program used to launch `atos` and `otool`
    pub xcrun: PathBuf,
    /// Xcode developer directory; `xcode-select -p` is asked when unset
    pub developer_dir: Option<PathBuf>,
    /// Run `symbolicatecrash` first when given a dSYM bundle
    pub pre_resolve: bool,
}

impl Config {
    pub fn new(crash_report: impl Into<PathBuf>, symbols: impl Into<PathBuf>) -> Self {
        Self {
            crash_report: crash_report.into(),
            symbols: symbols.into(),
            xcrun: PathBuf::from("xcrun"),
            developer_dir: None,
            pre_resolve: true,
        }
    }

    #[must_use]
    pub fn with_xcrun(mut self, xcrun: impl Into<PathBuf>) -> Self {
        self.xcrun = xcrun.into();
        self
    }

    #[must_use]
    pub fn with_developer_dir(mut self, developer_dir: Option<PathBuf>) -> Self {
        self.developer_dir = developer_dir;
        self
    }

    #[must_use]
    pub fn with_pre_resolve(mut self, pre_resolve: bool) -> Self {
        self.pre_resolve = pre_resolve;
        self
    }
}
