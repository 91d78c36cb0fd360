//! The scan/patch loop.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::pattern::{find_all, validate_patterns};
use crate::target::{TargetAccess, TargetSpec};

/// A located occurrence of the search pattern, as absolute addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    pub start: u64,
    pub end: u64,
}

/// Everything one scan produced: match locations plus patch bookkeeping.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    /// Matches across all regions, ascending by start address.
    pub matches: Vec<Match>,
    /// Regions that were read and searched.
    pub regions_scanned: usize,
    /// Regions skipped because their read failed mid-scan.
    pub regions_skipped: usize,
    /// Patch writes attempted. Zero when no replacement was given.
    pub writes_attempted: usize,
    /// Patch writes that succeeded.
    pub writes_applied: usize,
}

/// Scan an open target for `search`, patching each match with `replace` when
/// one is given.
///
/// Patches are written in ascending address order as matches are found.
/// Overlapping matches are reported individually, so a later patch may
/// overwrite bytes an earlier one wrote; that is accepted behavior, not an
/// error. A failed region read or a failed patch write is logged and skipped
/// rather than aborting the rest of the scan. File targets flush their
/// buffered writes once, after the whole scan.
pub fn scan(
    target: &dyn TargetAccess,
    search: &[u8],
    replace: Option<&[u8]>,
) -> Result<ScanOutcome> {
    validate_patterns(search, replace)?;

    let mut outcome = ScanOutcome::default();
    for region in target.regions()? {
        if !region.is_scannable() {
            debug!("Region {} is not committed+readable, skipping", region);
            continue;
        }

        let bytes = match target.read_region(&region) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping region {}: {}", region, e);
                outcome.regions_skipped += 1;
                continue;
            }
        };
        outcome.regions_scanned += 1;

        for offset in find_all(&bytes, search)? {
            let start = region.base + offset as u64;
            outcome.matches.push(Match {
                start,
                end: start + search.len() as u64,
            });

            if let Some(replace) = replace {
                outcome.writes_attempted += 1;
                match target.write(start, replace) {
                    Ok(()) => {
                        debug!("Patched match at {:#x}", start);
                        outcome.writes_applied += 1;
                    }
                    Err(e) => warn!("Failed to patch match at {:#x}: {}", start, e),
                }
            }
        }
    }

    if replace.is_some() {
        target.commit()?;
    }

    debug!(
        "Scan complete: {} match(es), {} region(s) scanned, {} skipped",
        outcome.matches.len(),
        outcome.regions_scanned,
        outcome.regions_skipped
    );
    Ok(outcome)
}

/// Open `spec` and scan it.
///
/// Patterns are validated before the target is touched, and the target is
/// released when the scan returns, on every path.
pub fn scan_target(
    spec: &TargetSpec,
    search: &[u8],
    replace: Option<&[u8]>,
) -> Result<ScanOutcome> {
    validate_patterns(search, replace)?;
    let target = spec.open()?;
    scan(target.as_ref(), search, replace)
}
