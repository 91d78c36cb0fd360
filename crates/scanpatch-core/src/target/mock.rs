//! Test-only target with scripted regions and failures.

use std::cell::{Cell, RefCell};

use crate::error::{Error, Result};
use crate::region::Region;
use crate::target::TargetAccess;

struct MockRegion {
    region: Region,
    bytes: RefCell<Vec<u8>>,
    fail_reads: bool,
}

/// Builds a [`MockTarget`] region by region.
#[derive(Default)]
pub struct MockTargetBuilder {
    regions: Vec<MockRegion>,
    fail_writes: bool,
}

impl MockTargetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scannable region holding `bytes`.
    pub fn region(mut self, base: u64, bytes: &[u8]) -> Self {
        self.regions.push(MockRegion {
            region: Region {
                base,
                size: bytes.len() as u64,
                readable: true,
                committed: true,
            },
            bytes: RefCell::new(bytes.to_vec()),
            fail_reads: false,
        });
        self
    }

    /// A region that looks scannable but fails every read, like a mapping
    /// torn down between enumeration and read.
    pub fn failing_region(mut self, base: u64, size: u64) -> Self {
        self.regions.push(MockRegion {
            region: Region {
                base,
                size,
                readable: true,
                committed: true,
            },
            bytes: RefCell::new(vec![0; size as usize]),
            fail_reads: true,
        });
        self
    }

    pub fn unreadable_region(mut self, base: u64, size: u64) -> Self {
        self.regions.push(MockRegion {
            region: Region {
                base,
                size,
                readable: false,
                committed: true,
            },
            bytes: RefCell::new(vec![0; size as usize]),
            fail_reads: false,
        });
        self
    }

    pub fn uncommitted_region(mut self, base: u64, size: u64) -> Self {
        self.regions.push(MockRegion {
            region: Region {
                base,
                size,
                readable: true,
                committed: false,
            },
            bytes: RefCell::new(vec![0; size as usize]),
            fail_reads: false,
        });
        self
    }

    /// Make every patch write fail.
    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn build(self) -> MockTarget {
        MockTarget {
            regions: self.regions,
            fail_writes: self.fail_writes,
            reads: Cell::new(0),
            commits: Cell::new(0),
            writes: RefCell::new(Vec::new()),
        }
    }
}

/// In-memory target that records how the scan loop touched it.
pub struct MockTarget {
    regions: Vec<MockRegion>,
    fail_writes: bool,
    reads: Cell<usize>,
    commits: Cell<usize>,
    writes: RefCell<Vec<u64>>,
}

impl MockTarget {
    /// Read attempts, including ones that failed.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.get()
    }

    /// Addresses of successful writes, in the order they happened.
    pub fn write_addresses(&self) -> Vec<u64> {
        self.writes.borrow().clone()
    }

    /// Current bytes of the region based at `base`.
    pub fn region_bytes(&self, base: u64) -> Vec<u8> {
        self.regions
            .iter()
            .find(|r| r.region.base == base)
            .map(|r| r.bytes.borrow().clone())
            .unwrap_or_else(|| panic!("no mock region at {base:#x}"))
    }

    fn region_at(&self, base: u64) -> Option<&MockRegion> {
        self.regions.iter().find(|r| r.region.base == base)
    }
}

impl TargetAccess for MockTarget {
    fn regions(&self) -> Result<Box<dyn Iterator<Item = Region> + '_>> {
        Ok(Box::new(self.regions.iter().map(|r| r.region)))
    }

    fn read_region(&self, region: &Region) -> Result<Vec<u8>> {
        self.reads.set(self.reads.get() + 1);
        let slot = self
            .region_at(region.base)
            .ok_or_else(|| Error::RegionReadFailed {
                address: region.base,
                message: "no mock region at this base".to_string(),
            })?;
        if slot.fail_reads {
            return Err(Error::RegionReadFailed {
                address: region.base,
                message: "scripted read failure".to_string(),
            });
        }
        Ok(slot.bytes.borrow().clone())
    }

    fn write(&self, address: u64, data: &[u8]) -> Result<()> {
        let fail = |message: &str| Error::RegionWriteFailed {
            address,
            size: data.len(),
            message: message.to_string(),
        };
        if self.fail_writes {
            return Err(fail("scripted write failure"));
        }
        let slot = self
            .regions
            .iter()
            .find(|r| {
                r.region.contains(address) && address + data.len() as u64 <= r.region.end()
            })
            .ok_or_else(|| fail("write outside every mock region"))?;
        let offset = (address - slot.region.base) as usize;
        slot.bytes.borrow_mut()[offset..offset + data.len()].copy_from_slice(data);
        self.writes.borrow_mut().push(address);
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.commits.set(self.commits.get() + 1);
        Ok(())
    }
}
