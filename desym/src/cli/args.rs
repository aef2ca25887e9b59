//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "desym",
    version,
    about = "Desymbolicate an iOS crash report in place",
    after_help = "\
EXAMPLES:
    desym MyApp_2024-01-01_iPhone.crash Payload/MyApp.app/MyApp
    desym MyApp_2024-01-01_iPad.ips MyApp.app.dSYM/Contents/Resources/DWARF/MyApp

The original report is kept next to it with a .dbak suffix."
)]
pub struct Args {
    /// Crash report to desymbolicate
    #[arg(value_name = "CRASH_REPORT")]
    pub crash_report: PathBuf,

    /// dSYM bundle, app bundle or app binary matching the report
    #[arg(value_name = "SYMBOLS")]
    pub symbols: PathBuf,

    /// Do not run symbolicatecrash before atos for dSYM bundles
    #[arg(long)]
    pub no_symbolicatecrash: bool,

    /// Xcode developer directory (default: output of `xcode-select -p`)
    #[arg(long, env = "DEVELOPER_DIR", value_name = "DIR")]
    pub developer_dir: Option<PathBuf>,

    /// Program used to launch atos and otool
    #[arg(long, default_value = "xcrun", value_name = "PROGRAM")]
    pub xcrun: PathBuf,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    #[must_use]
    pub fn to_config(&self) -> Config {
        Config::new(&self.crash_report, &self.symbols)
            .with_xcrun(&self.xcrun)
            .with_developer_dir(self.developer_dir.clone())
            .with_pre_resolve(!self.no_symbolicatecrash)
    }
}
