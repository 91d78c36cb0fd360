//! Windows process targets, via `VirtualQueryEx` and the remote-memory APIs.

use std::ffi::c_void;
use std::mem;

use tracing::debug;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory};
use windows::Win32::System::Memory::{
    MEM_COMMIT, MEMORY_BASIC_INFORMATION, PAGE_EXECUTE_READ, PAGE_EXECUTE_READWRITE,
    PAGE_EXECUTE_WRITECOPY, PAGE_GUARD, PAGE_NOACCESS, PAGE_PROTECTION_FLAGS, PAGE_READONLY,
    PAGE_READWRITE, PAGE_WRITECOPY, VirtualQueryEx,
};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_OPERATION, PROCESS_VM_READ,
    PROCESS_VM_WRITE,
};

use crate::error::{Error, Result};
use crate::region::Region;
use crate::target::TargetAccess;

/// A live process opened for scanning and patching.
///
/// The handle is opened with query, read, write and memory-operation rights
/// so an underprivileged invocation fails at acquisition rather than at the
/// first patch. The handle closes on drop.
pub struct ProcessTarget {
    handle: HANDLE,
}

impl ProcessTarget {
    pub fn open(pid: u32) -> Result<Self> {
        // SAFETY: OpenProcess has no preconditions; a failed open returns an
        // error rather than a handle.
        let handle = unsafe {
            OpenProcess(
                PROCESS_QUERY_INFORMATION
                    | PROCESS_VM_READ
                    | PROCESS_VM_WRITE
                    | PROCESS_VM_OPERATION,
                false,
                pid,
            )
        }
        .map_err(|e| Error::TargetUnavailable(format!("cannot open process {pid}: {e}")))?;
        debug!("Opened process {} with handle {:?}", pid, handle);
        Ok(Self { handle })
    }
}

impl Drop for ProcessTarget {
    fn drop(&mut self) {
        // SAFETY: the handle came from a successful OpenProcess and is
        // closed exactly once.
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}

impl TargetAccess for ProcessTarget {
    fn regions(&self) -> Result<Box<dyn Iterator<Item = Region> + '_>> {
        Ok(Box::new(RegionWalk {
            handle: self.handle,
            address: 0,
        }))
    }

    fn read_region(&self, region: &Region) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; region.size as usize];
        let mut bytes_read = 0usize;
        // SAFETY: the buffer outlives the call and its length bounds the read.
        let read = unsafe {
            ReadProcessMemory(
                self.handle,
                region.base as *const c_void,
                buffer.as_mut_ptr().cast(),
                buffer.len(),
                Some(&mut bytes_read),
            )
        };
        // A failed call with a nonzero count is a partial read; scan the
        // prefix that arrived.
        if read.is_err() && bytes_read == 0 {
            return Err(Error::RegionReadFailed {
                address: region.base,
                message: read.unwrap_err().to_string(),
            });
        }
        buffer.truncate(bytes_read);
        Ok(buffer)
    }

    fn write(&self, address: u64, data: &[u8]) -> Result<()> {
        let mut written = 0usize;
        // SAFETY: data's length bounds the write into the remote process.
        unsafe {
            WriteProcessMemory(
                self.handle,
                address as *const c_void,
                data.as_ptr().cast(),
                data.len(),
                Some(&mut written),
            )
        }
        .map_err(|e| Error::RegionWriteFailed {
            address,
            size: data.len(),
            message: e.to_string(),
        })?;
        if written != data.len() {
            return Err(Error::RegionWriteFailed {
                address,
                size: data.len(),
                message: format!("short write of {written} bytes"),
            });
        }
        Ok(())
    }
}

/// Steps through the address space one `VirtualQueryEx` at a time, from each
/// region's base to `base + size`, until the query runs out of regions.
struct RegionWalk {
    handle: HANDLE,
    address: usize,
}

impl Iterator for RegionWalk {
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        let mut info = MEMORY_BASIC_INFORMATION::default();
        // SAFETY: info is a properly sized out-parameter for the query.
        let len = unsafe {
            VirtualQueryEx(
                self.handle,
                Some(self.address as *const c_void),
                &mut info,
                mem::size_of::<MEMORY_BASIC_INFORMATION>(),
            )
        };
        if len == 0 || info.RegionSize == 0 {
            return None;
        }

        let base = info.BaseAddress as usize;
        self.address = base.checked_add(info.RegionSize)?;
        Some(Region {
            base: base as u64,
            size: info.RegionSize as u64,
            readable: is_readable(info.Protect),
            committed: info.State == MEM_COMMIT,
        })
    }
}

const READABLE_PROTECTIONS: u32 = PAGE_READONLY.0
    | PAGE_READWRITE.0
    | PAGE_WRITECOPY.0
    | PAGE_EXECUTE_READ.0
    | PAGE_EXECUTE_READWRITE.0
    | PAGE_EXECUTE_WRITECOPY.0;

/// A region is readable when a readable protection is set and the page is
/// neither guarded nor PAGE_NOACCESS. Guard pages raise on touch, so reading
/// them would perturb the target.
fn is_readable(protect: PAGE_PROTECTION_FLAGS) -> bool {
    protect.0 & READABLE_PROTECTIONS != 0 && protect.0 & (PAGE_GUARD.0 | PAGE_NOACCESS.0) == 0
}
