//! Error types for tabmat operations

use std::fmt;
use std::io;

/// Errors that can occur while working with mapped regions
#[derive(Debug)]
pub enum TabmatError {
    /// Backing file could not be opened or prepared
    Open(io::Error),
    /// The mapping call was rejected by the environment
    Map(io::Error),
    /// The path could not be stat'ed when sizing
    Stat(io::Error),
    /// Anonymous memory could not be obtained
    Allocation(io::Error),
    /// Dirty pages could not be flushed to the backing file
    Flush(io::Error),
    /// Reading the backing file during a scan failed
    Scan(io::Error),
    /// Field or record query on a region with no backing path
    MissingPath,
    /// The text holds no non-comment, non-blank line
    NoDataLine,
    /// Mutable access to a read-only mapping
    ReadOnly,
    /// Typed matrix access to a region of another content kind
    NotDoubleMatrix,
    /// Matrix dimensions overflow the addressable size
    SizeOverflow,
}

impl fmt::Display for TabmatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabmatError::Open(err) => write!(f, "failed to open backing file: {err}"),
            TabmatError::Map(err) => write!(f, "failed to establish mapping: {err}"),
            TabmatError::Stat(err) => write!(f, "failed to stat path: {err}"),
            TabmatError::Allocation(err) => write!(f, "failed to map anonymous memory: {err}"),
            TabmatError::Flush(err) => write!(f, "failed to flush mapping: {err}"),
            TabmatError::Scan(err) => write!(f, "failed to read backing file: {err}"),
            TabmatError::MissingPath => write!(f, "region has no backing path"),
            TabmatError::NoDataLine => write!(f, "text holds no data line"),
            TabmatError::ReadOnly => write!(f, "region is mapped read-only"),
            TabmatError::NotDoubleMatrix => write!(f, "region does not hold a double matrix"),
            TabmatError::SizeOverflow => write!(f, "size calculation would overflow"),
        }
    }
}

impl std::error::Error for TabmatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TabmatError::Open(err)
            | TabmatError::Map(err)
            | TabmatError::Stat(err)
            | TabmatError::Allocation(err)
            | TabmatError::Flush(err)
            | TabmatError::Scan(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for tabmat operations
pub type Result<T> = std::result::Result<T, TabmatError>;
