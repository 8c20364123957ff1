//! Line classification and field counting
//!
//! A text table is scanned line by line. Lines opening with `#` are
//! comments, a line consisting solely of its terminator is blank, and
//! everything else is data. Field counting looks at a single data line:
//! trailing and leading separators are stripped, then each maximal run
//! of separators inside the remainder counts as one boundary.

use crate::separators::Separators;

/// Byte that marks a whole-line comment
pub const COMMENT_BYTE: u8 = b'#';

/// Classification of one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Line opens with the comment byte
    Comment,
    /// Line holds nothing but its terminator
    Blank,
    /// Line carries field data
    Data,
}

/// Classify a line, terminator included
pub fn classify_line(line: &[u8]) -> LineKind {
    match line.first() {
        None | Some(&b'\n') => LineKind::Blank,
        Some(&COMMENT_BYTE) => LineKind::Comment,
        Some(_) => LineKind::Data,
    }
}

/// Count the fields on one data line
///
/// Trailing separators are stripped first, then leading ones. Each run
/// of consecutive separators left in the remainder is a single field
/// boundary, so the count is run-count + 1. A line that is nothing but
/// separators therefore counts as one field.
pub fn count_fields(line: &[u8], seps: &Separators) -> usize {
    let mut end = line.len();
    while end > 0 && seps.contains(line[end - 1]) {
        end -= 1;
    }

    let mut start = 0;
    while start < end && seps.contains(line[start]) {
        start += 1;
    }

    let mut boundaries = 0;
    let mut in_run = false;
    let mut i = start;
    while i < end {
        if seps.contains(line[i]) {
            if !in_run {
                boundaries += 1;
                in_run = true;
            }
        } else {
            in_run = false;
        }
        i += 1;
    }

    boundaries + 1
}
