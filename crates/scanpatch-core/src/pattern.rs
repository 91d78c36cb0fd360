//! Byte-pattern matching over region buffers.

use memchr::memmem;

use crate::error::{Error, Result};

/// Find every occurrence of `needle` in `haystack`, ascending.
///
/// The search resumes one byte after each match rather than past it, so
/// overlapping occurrences are all reported individually: `"aa"` in
/// `"aaaa"` yields offsets 0, 1 and 2.
pub fn find_all(haystack: &[u8], needle: &[u8]) -> Result<Vec<usize>> {
    if needle.is_empty() {
        return Err(Error::EmptyPattern);
    }

    let mut offsets = Vec::new();
    if haystack.len() < needle.len() {
        return Ok(offsets);
    }

    let finder = memmem::Finder::new(needle);
    let mut from = 0;
    while let Some(pos) = finder.find(&haystack[from..]) {
        let found = from + pos;
        offsets.push(found);
        from = found + 1;
    }

    Ok(offsets)
}

/// Check the scan preconditions: a non-empty search pattern and, when a
/// replacement is given, equal lengths.
///
/// Runs before any target I/O; an unequal-length replacement would shift
/// file contents or corrupt memory adjacent to a match.
pub fn validate_patterns(search: &[u8], replace: Option<&[u8]>) -> Result<()> {
    if search.is_empty() {
        return Err(Error::EmptyPattern);
    }
    if let Some(replace) = replace
        && replace.len() != search.len()
    {
        return Err(Error::LengthMismatch {
            search: search.len(),
            replace: replace.len(),
        });
    }
    Ok(())
}
