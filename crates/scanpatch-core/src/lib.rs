//! # scanpatch-core
//!
//! Engine for locating a byte pattern in a file or a live process and
//! optionally patching every occurrence in place with an equal-length
//! replacement.
//!
//! This crate provides:
//! - Overlap-permitting byte-pattern search (`find_all`)
//! - Region enumeration for files, Linux processes (`/proc`) and Windows
//!   processes (`VirtualQueryEx`)
//! - A capability trait (`TargetAccess`) so the scan loop never branches on
//!   platform
//! - The scan/patch orchestrator (`scan`, `scan_target`)

pub mod error;
pub mod pattern;
pub mod region;
pub mod scan;
pub mod target;

pub use error::{Error, Result};
pub use pattern::{find_all, validate_patterns};
pub use region::Region;
pub use scan::{Match, ScanOutcome, scan, scan_target};
#[cfg(any(target_os = "linux", target_os = "windows"))]
pub use target::ProcessTarget;
pub use target::{FileTarget, TargetAccess, TargetSpec};
