//! Linux process targets, via `/proc/<pid>/maps` and `/proc/<pid>/mem`.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader};
use std::os::unix::fs::FileExt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::region::Region;
use crate::target::TargetAccess;

/// A live process opened for scanning and patching.
///
/// `/proc/<pid>/mem` is opened read-write up front, so an unprivileged
/// invocation fails at acquisition rather than at the first patch. The
/// descriptor closes on drop.
#[derive(Debug)]
pub struct ProcessTarget {
    pid: u32,
    mem: File,
}

impl ProcessTarget {
    pub fn open(pid: u32) -> Result<Self> {
        let mem = OpenOptions::new()
            .read(true)
            .write(true)
            .open(format!("/proc/{pid}/mem"))
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    Error::TargetUnavailable(format!("process {pid} does not exist"))
                }
                io::ErrorKind::PermissionDenied => Error::TargetUnavailable(format!(
                    "permission denied for process {pid}, try running as root"
                )),
                _ => Error::TargetUnavailable(format!("cannot open process {pid}: {e}")),
            })?;
        debug!("Opened /proc/{}/mem", pid);
        Ok(Self { pid, mem })
    }
}

impl TargetAccess for ProcessTarget {
    fn regions(&self) -> Result<Box<dyn Iterator<Item = Region> + '_>> {
        let maps = File::open(format!("/proc/{}/maps", self.pid)).map_err(|e| {
            Error::TargetUnavailable(format!("cannot read maps of process {}: {e}", self.pid))
        })?;
        Ok(Box::new(
            BufReader::new(maps)
                .lines()
                .map_while(|line| line.ok())
                .filter_map(|line| parse_maps_line(&line)),
        ))
    }

    fn read_region(&self, region: &Region) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; region.size as usize];
        let mut filled = 0;
        while filled < buffer.len() {
            match self.mem.read_at(&mut buffer[filled..], region.base + filled as u64) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                // A short read means the rest of the region went away;
                // scan what we got.
                Err(_) if filled > 0 => break,
                Err(e) => {
                    return Err(Error::RegionReadFailed {
                        address: region.base,
                        message: e.to_string(),
                    });
                }
            }
        }
        buffer.truncate(filled);
        Ok(buffer)
    }

    fn write(&self, address: u64, data: &[u8]) -> Result<()> {
        self.mem
            .write_all_at(data, address)
            .map_err(|e| Error::RegionWriteFailed {
                address,
                size: data.len(),
                message: e.to_string(),
            })
    }
}

/// Parse one `/proc/<pid>/maps` line, e.g.
/// `7f1bc0a00000-7f1bc0a21000 r--p 00000000 103:02 2622355 /usr/lib/libc.so.6`.
fn parse_maps_line(line: &str) -> Option<Region> {
    let mut fields = line.split_whitespace();
    let (start, end) = fields.next()?.split_once('-')?;
    let perms = fields.next()?;

    let base = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    if end <= base {
        return None;
    }

    Some(Region {
        base,
        size: end - base,
        readable: perms.starts_with('r'),
        // Linux only lists mappings that are backed
        committed: true,
    })
}
