//! Target acquisition and the capability seam the scan loop runs against.
//!
//! A target is opened once per invocation and released when dropped. The
//! platform differences (whole file vs `/proc` vs `VirtualQueryEx`) live
//! behind [`TargetAccess`], so the orchestrator never branches on platform.

use std::path::PathBuf;

use crate::error::Result;
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
use crate::error::Error;
use crate::region::Region;

mod file;
#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(test)]
pub mod mock;

pub use file::FileTarget;
#[cfg(target_os = "linux")]
pub use linux::ProcessTarget;
#[cfg(target_os = "windows")]
pub use windows::ProcessTarget;

#[cfg(test)]
pub use mock::{MockTarget, MockTargetBuilder};

/// Capabilities the scan loop needs from an open target: enumerate regions,
/// materialize one, patch at an absolute address, flush buffered patches.
pub trait TargetAccess {
    /// Enumerate the target's regions in ascending base order.
    ///
    /// The sequence is produced lazily and reflects the target at the moment
    /// each region is yielded; unscannable regions are included so callers
    /// can report them.
    fn regions(&self) -> Result<Box<dyn Iterator<Item = Region> + '_>>;

    /// Read a region's bytes. A short result means the tail was unreadable;
    /// a region that cannot be read at all is an error the caller may treat
    /// as region-local.
    fn read_region(&self, region: &Region) -> Result<Vec<u8>>;

    /// Overwrite `data.len()` bytes at an absolute address inside a
    /// previously enumerated region.
    fn write(&self, address: u64, data: &[u8]) -> Result<()>;

    /// Flush writes that the target buffers. Process memory takes writes
    /// immediately, so only buffering targets override this.
    fn commit(&self) -> Result<()> {
        Ok(())
    }
}

/// An unopened target reference, as handed over by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// A file on disk, scanned as one region.
    File(PathBuf),
    /// A live process, scanned region by region.
    Process(u32),
}

impl TargetSpec {
    /// Acquire the target, choosing the platform implementation once.
    ///
    /// The returned handle holds every OS resource the scan needs and
    /// releases them on drop.
    pub fn open(&self) -> Result<Box<dyn TargetAccess>> {
        match self {
            TargetSpec::File(path) => Ok(Box::new(FileTarget::open(path)?)),
            #[cfg(any(target_os = "linux", target_os = "windows"))]
            TargetSpec::Process(pid) => Ok(Box::new(ProcessTarget::open(*pid)?)),
            #[cfg(not(any(target_os = "linux", target_os = "windows")))]
            TargetSpec::Process(_) => Err(Error::UnsupportedPlatform(std::env::consts::OS)),
        }
    }
}
