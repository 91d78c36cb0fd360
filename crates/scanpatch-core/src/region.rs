use std::fmt;

use serde::Serialize;

/// A contiguous addressable range of a target.
///
/// Regions are ephemeral: they describe the target as it looked during one
/// enumeration pass and carry no identity beyond their address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    /// Absolute address (or file offset) of the first byte.
    pub base: u64,
    /// Number of addressable bytes.
    pub size: u64,
    /// Whether the OS reports the range as readable.
    pub readable: bool,
    /// Whether backing memory is committed. Always true for files and Linux
    /// mappings; Windows reports reserved-only ranges as uncommitted.
    pub committed: bool,
}

impl Region {
    /// First address past the region.
    pub fn end(&self) -> u64 {
        self.base + self.size
    }

    /// Whether a scan should read this region at all.
    pub fn is_scannable(&self) -> bool {
        self.committed && self.readable
    }

    /// Whether an absolute address falls inside the region.
    pub fn contains(&self, address: u64) -> bool {
        address >= self.base && address < self.end()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#x}-{:#x} {}{}",
            self.base,
            self.end(),
            if self.readable { 'r' } else { '-' },
            if self.committed { 'c' } else { '-' },
        )
    }
}
