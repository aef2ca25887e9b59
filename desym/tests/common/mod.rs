#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use desym::symbolization::{Invocation, ToolRunner};
use desym::DesymError;

pub const BINARY_IMAGES: &str = "\
Binary Images:
0x100000000 - 0x100ffffff +MyApp arm64  <9b2ecfd7e5a83b8cb9a1d7e7ef2d5c41> /var/containers/Bundle/Application/0A1B/MyApp.app/MyApp
0x1842fa000 - 0x18431efff libsystem_kernel.dylib arm64  <f5a1b1a0d9a63f3e8f5a1b1a0d9a63f3> /usr/lib/system/libsystem_kernel.dylib
";

/// Build a report around the given backtrace lines.
pub fn report(backtrace: &str) -> String {
    format!(
        "Incident Identifier: 6156848E-344E-4D9E-84E0-87AFD0D0AE7B\n\
         Process:             MyApp [1234]\n\
         \n\
         Thread 0 Crashed:\n\
         {backtrace}\n\
         {BINARY_IMAGES}"
    )
}

/// A temporary report file plus a plain binary to resolve against.
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub root: PathBuf,
    pub report: PathBuf,
    pub binary: PathBuf,
}

impl Workspace {
    pub fn new(contents: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        // The pipeline reports canonical paths
        let root = dir.path().canonicalize().unwrap();
        let report = root.join("MyApp_2024-01-01_iPhone.crash");
        let binary = root.join("MyApp");
        fs::write(&report, contents).unwrap();
        fs::write(&binary, b"\xcf\xfa\xed\xfe").unwrap();
        Self { dir, root, report, binary }
    }

    pub fn read_report(&self) -> String {
        fs::read_to_string(&self.report).unwrap()
    }

    pub fn backup(&self) -> PathBuf {
        desym::rewrite::backup_path(&self.report)
    }
}

/// Stand-in for xcrun, xcode-select and symbolicatecrash.
///
/// `atos` answers with `atos_output` if set, otherwise one
/// `fn_<addr> (in MyApp)` line per address.
#[derive(Default)]
pub struct StubRunner {
    pub atos_output: Option<String>,
    pub symbolicated: Option<String>,
    pub calls: RefCell<Vec<Invocation>>,
}

impl StubRunner {
    pub fn with_atos_output(output: &str) -> Self {
        Self { atos_output: Some(output.to_string()), ..Self::default() }
    }

    pub fn calls(&self, name: &str) -> Vec<Invocation> {
        self.calls.borrow().iter().filter(|c| c.name == name).cloned().collect()
    }
}

impl ToolRunner for StubRunner {
    fn run(&self, invocation: &Invocation) -> Result<String, DesymError> {
        self.calls.borrow_mut().push(invocation.clone());
        match invocation.name.as_str() {
            "otool" => Ok(
                "      cmd LC_SEGMENT_64\n  segname __TEXT\n   vmaddr 0x0000000000001000\n".to_string()
            ),
            "atos" => Ok(self.atos_output.clone().unwrap_or_else(|| {
                let addrs = invocation.args.iter().skip_while(|a| *a != "-arch").skip(2);
                addrs.map(|a| format!("fn_{} (in MyApp)\n", a.to_string_lossy())).collect()
            })),
            "symbolicatecrash" => self.symbolicated.clone().ok_or_else(|| DesymError::ToolFailed {
                tool: invocation.name.clone(),
                status: "exit status: 1".to_string(),
                stderr: "No symbolic information found".to_string(),
            }),
            "xcode-select" => Err(DesymError::ToolUnavailable {
                tool: invocation.name.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
            other => panic!("unexpected tool {other}"),
        }
    }
}

/// Create `<root>/Xcode.app/Contents/Developer` with a `symbolicatecrash`
/// at its SharedFrameworks location, returning the developer directory and
/// the tool path.
pub fn fake_developer_dir(root: &Path, script: &str) -> (PathBuf, PathBuf) {
    let developer = root.join("Xcode.app/Contents/Developer");
    fs::create_dir_all(&developer).unwrap();
    let tool = root.join(
        "Xcode.app/Contents/SharedFrameworks/DVTFoundation.framework/Versions/A/Resources/symbolicatecrash",
    );
    fs::create_dir_all(tool.parent().unwrap()).unwrap();
    fs::write(&tool, script).unwrap();
    (developer, tool)
}

/// Create `<root>/MyApp.app.dSYM` with its DWARF object.
pub fn fake_dsym(root: &Path) -> PathBuf {
    let bundle = root.join("MyApp.app.dSYM");
    let dwarf = bundle.join("Contents/Resources/DWARF");
    fs::create_dir_all(&dwarf).unwrap();
    fs::write(dwarf.join("MyApp"), b"\xcf\xfa\xed\xfe").unwrap();
    bundle
}
