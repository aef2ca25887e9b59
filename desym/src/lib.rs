//! # desym - in-place crash report desymbolication
//!
//! Rewrites the raw frame addresses of an iOS crash report into symbol
//! names using Xcode's `atos`, keeping every other line of the report as it
//! was.
//!
//! ## Pipeline
//!
//! ```text
//!  crash report ──▶ preflight ──▶ symbolicatecrash (optional, dSYM only)
//!                                        │
//!                                        ▼
//!                  report scanner: "Binary Images:" descriptor
//!                  (load address, name, arch, uuid) + frame patterns
//!                                        │
//!                                        ▼
//!                  address resolver: collect raw frames, pick mode,
//!                  otool (slide) + one batched atos call
//!                                        │
//!                                        ▼
//!                  rewriter: substitute lines, write .dbak, overwrite
//! ```
//!
//! ## Module Structure
//!
//! - [`report`]: descriptor scanning and frame classification
//! - [`symbolization`]: slide discovery, `atos` batching, result threading
//! - [`preresolve`]: Xcode toolchain discovery and the `symbolicatecrash` pass
//! - [`rewrite`]: line substitution and the backup-then-overwrite write
//! - [`pipeline`]: the stages wired together
//! - [`cli`], [`config`]: command line and run configuration
//! - [`domain`]: addresses and errors
//!
//! ## Typical Usage
//!
//! ```bash
//! desym MyApp_2024-01-01_iPhone.crash Payload/MyApp.app/MyApp
//! RUST_LOG=debug desym MyApp.ips MyApp.app.dSYM
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod pipeline;
pub mod preflight;
pub mod preresolve;
pub mod report;
pub mod rewrite;
pub mod symbolization;

pub use config::Config;
pub use domain::{Address, DesymError};
pub use pipeline::{desymbolicate, Outcome};
