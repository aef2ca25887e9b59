//! # Address Resolution
//!
//! Turns the raw frame addresses of a crash report into symbol names by
//! batching them through `atos`.
//!
//! ## Address Translation
//!
//! A frame records the runtime address of an instruction. `atos` can map it
//! either against the runtime load address of the image (`-l`) or after
//! translating it into the binary's own address space:
//!
//! ```text
//! symbol address = slide + stack address - load address
//!
//! slide          = __TEXT vmaddr from `otool -l`        0x0000000100000000
//! load address   = first Binary Images entry            0x0000000104a80000
//! stack address  = frame address in the backtrace       0x0000000104b5c6d8
//! ```
//!
//! ## Module Structure
//!
//! - **`tools`**: process invocation behind the [`ToolRunner`] trait
//! - **`slide`**: `__TEXT` segment base discovery via `otool`
//! - **`atos`**: the single batched `atos` lookup
//! - **`resolver`**: frame collection, mode selection and result threading
//! - **`source`**: dSYM / `.app` bundle to object file mapping

pub mod atos;
pub mod resolver;
pub mod slide;
pub mod source;
pub mod tools;

pub use atos::{LookupBatch, LookupMode};
pub use resolver::{collect_frames, symbol_address, AddressResolver, ResolutionMap};
pub use slide::discover_slide_address;
pub use source::{dsym_bundle, resolve_object_path};
pub use tools::{Invocation, SystemRunner, ToolRunner, Xcrun};
