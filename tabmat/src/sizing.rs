//! Page-aware size queries
//!
//! Mappings are sized in whole pages. The rounding rule always moves to
//! the next page multiple, so the mapped size strictly exceeds the
//! logical size even when the latter is itself an exact page multiple.

use std::fs;
use std::path::Path;

use crate::error::{Result, TabmatError};

/// Platform memory page size in bytes
pub fn page_size() -> usize {
    // SAFETY: sysconf reads a static configuration value and has no
    // memory-safety preconditions.
    let raw = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if raw <= 0 {
        4096
    } else {
        raw as usize
    }
}

/// Round `bytes` up to the next page multiple
///
/// The result is always strictly greater than `bytes`: an exact page
/// multiple still gains one more full page.
pub fn round_to_pages(bytes: u64) -> u64 {
    let page = page_size() as u64;
    (bytes / page + 1) * page
}

/// Raw byte length of the file at `path`
pub fn logical_file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    let meta = fs::metadata(path).map_err(TabmatError::Stat)?;
    Ok(meta.len())
}

/// Page-rounded mapping size for the file at `path`
pub fn page_rounded_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    Ok(round_to_pages(logical_file_size(path)?))
}
