//! Field and record counting over text regions
//!
//! Counting reads the backing file line by line rather than walking the
//! mapping, so it works on any region that still has a path. Results
//! are memoized on the region: repeated queries are O(1) and observably
//! stale if the file changes underneath, until
//! [`MappedRegion::invalidate_counts`] is called.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use log::trace;
use tabmat_core::{classify_line, count_fields, LineKind, Separators};

use crate::error::{Result, TabmatError};
use crate::region::MappedRegion;

/// Configuration for text scanning
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Separator set splitting records into fields
    pub separators: Separators,
    /// Longest line chunk read at once; longer lines are classified and
    /// counted per chunk
    pub max_line_len: usize,
}

impl ScanConfig {
    /// Replace the separator set
    pub fn with_separators(mut self, separators: Separators) -> Self {
        self.separators = separators;
        self
    }

    /// Replace the line chunk limit
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            separators: Separators::default(),
            max_line_len: 4096,
        }
    }
}

/// Read one line chunk: up to `cap` bytes, stopping after a newline.
/// Returns the number of bytes placed in `buf`, zero at end of input.
fn read_line_capped<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>, cap: usize) -> io::Result<usize> {
    let cap = cap.max(1);
    buf.clear();
    while buf.len() < cap {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            break;
        }
        let room = cap - buf.len();
        let window = &available[..available.len().min(room)];
        match window.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                buf.extend_from_slice(&window[..=pos]);
                reader.consume(pos + 1);
                break;
            }
            None => {
                let taken = window.len();
                buf.extend_from_slice(window);
                reader.consume(taken);
            }
        }
    }
    Ok(buf.len())
}

impl MappedRegion {
    /// Number of fields on the first data line of the backing text
    ///
    /// Comment (`#`) and blank lines are skipped; the first remaining
    /// line decides the count for the whole region and later lines are
    /// never consulted. Returns [`TabmatError::NoDataLine`] when every
    /// line is a comment or blank, and [`TabmatError::MissingPath`] for
    /// anonymous regions.
    pub fn text_fields(&mut self, config: &ScanConfig) -> Result<usize> {
        if let Some(count) = self.fields {
            return Ok(count);
        }

        let path = self.path().ok_or(TabmatError::MissingPath)?;
        let file = File::open(path).map_err(TabmatError::Open)?;
        let mut reader = BufReader::new(file);
        let mut line = Vec::with_capacity(config.max_line_len);

        loop {
            let read = read_line_capped(&mut reader, &mut line, config.max_line_len)
                .map_err(TabmatError::Scan)?;
            if read == 0 {
                return Err(TabmatError::NoDataLine);
            }
            match classify_line(&line) {
                LineKind::Comment | LineKind::Blank => continue,
                LineKind::Data => {
                    let count = count_fields(&line, &config.separators);
                    trace!("first data line carries {count} fields");
                    self.fields = Some(count);
                    return Ok(count);
                }
            }
        }
    }

    /// Number of data lines in the backing text
    ///
    /// Zero is a valid answer for a file of nothing but comments and
    /// blanks, unlike [`MappedRegion::text_fields`] which has no line
    /// to count fields on and errors instead.
    pub fn text_records(&mut self, config: &ScanConfig) -> Result<u64> {
        if let Some(count) = self.records {
            return Ok(count);
        }

        let path = self.path().ok_or(TabmatError::MissingPath)?;
        let file = File::open(path).map_err(TabmatError::Open)?;
        let mut reader = BufReader::new(file);
        let mut line = Vec::with_capacity(config.max_line_len);

        let mut count: u64 = 0;
        loop {
            let read = read_line_capped(&mut reader, &mut line, config.max_line_len)
                .map_err(TabmatError::Scan)?;
            if read == 0 {
                break;
            }
            if classify_line(&line) == LineKind::Data {
                count += 1;
            }
        }

        trace!("counted {count} records");
        self.records = Some(count);
        Ok(count)
    }
}
