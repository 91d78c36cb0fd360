//! Whole-file targets.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::region::Region;
use crate::target::TargetAccess;

/// A file opened as a single scannable region.
///
/// The entire file is read at open time and the filesystem is not touched
/// again until `commit`. Patch writes land in the in-memory copy and are
/// flushed back in one pass, so an interruption mid-scan never leaves a
/// half-patched file on disk.
#[derive(Debug)]
pub struct FileTarget {
    path: PathBuf,
    data: RefCell<Vec<u8>>,
    dirty: Cell<bool>,
}

impl FileTarget {
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|e| {
            Error::TargetUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        debug!("Opened {} ({} bytes)", path.display(), data.len());
        Ok(Self {
            path: path.to_path_buf(),
            data: RefCell::new(data),
            dirty: Cell::new(false),
        })
    }
}

impl TargetAccess for FileTarget {
    fn regions(&self) -> Result<Box<dyn Iterator<Item = Region> + '_>> {
        let region = Region {
            base: 0,
            size: self.data.borrow().len() as u64,
            readable: true,
            committed: true,
        };
        Ok(Box::new(std::iter::once(region)))
    }

    fn read_region(&self, region: &Region) -> Result<Vec<u8>> {
        let data = self.data.borrow();
        let start = region.base as usize;
        if start > data.len() {
            return Err(Error::RegionReadFailed {
                address: region.base,
                message: "region starts past end of file".to_string(),
            });
        }
        let end = data.len().min(start + region.size as usize);
        Ok(data[start..end].to_vec())
    }

    fn write(&self, address: u64, data: &[u8]) -> Result<()> {
        let mut buffer = self.data.borrow_mut();
        let start = address as usize;
        let Some(slot) = buffer.get_mut(start..start + data.len()) else {
            return Err(Error::RegionWriteFailed {
                address,
                size: data.len(),
                message: "write extends past end of file".to_string(),
            });
        };
        slot.copy_from_slice(data);
        self.dirty.set(true);
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        if !self.dirty.get() {
            return Ok(());
        }
        fs::write(&self.path, self.data.borrow().as_slice())?;
        self.dirty.set(false);
        debug!("Flushed patched bytes back to {}", self.path.display());
        Ok(())
    }
}
