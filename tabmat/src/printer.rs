//! Normalized text emission
//!
//! Walks a text region and re-emits its tokens with every separator run
//! collapsed to a single byte. The output is what a shell-style word
//! splitter would have seen, not the original spacing.

use std::io::{self, Write};

use tabmat_core::Separators;

use crate::region::MappedRegion;

impl MappedRegion {
    /// Write the region's text to `out` with separator runs collapsed
    ///
    /// Leading separators are stripped. Each token is followed by the
    /// single separator byte that terminated it, or by a line break when
    /// it was terminated by a null byte or the logical end of the
    /// region. Emission stops at the first null that follows a
    /// separator run. Output already written stays written if a later
    /// write fails.
    pub fn write_text<W: Write>(&self, seps: &Separators, out: &mut W) -> io::Result<()> {
        let end = self.logical_len().min(self.mapped_len() as u64) as usize;
        let text = &self.as_bytes()[..end];

        let mut cur = 0usize;
        while cur < end && seps.contains(text[cur]) {
            cur += 1;
        }
        if cur >= end || text[cur] == 0 {
            return Ok(());
        }

        loop {
            let start = cur;
            while cur < end && text[cur] != 0 && !seps.contains(text[cur]) {
                cur += 1;
            }
            out.write_all(&text[start..cur])?;

            if cur < end && text[cur] != 0 {
                out.write_all(&text[cur..cur + 1])?;
            } else {
                out.write_all(b"\n")?;
            }
            cur += 1;

            while cur < end && seps.contains(text[cur]) {
                cur += 1;
            }
            if cur >= end || text[cur] == 0 {
                return Ok(());
            }
        }
    }

    /// Emit the normalized text on standard output
    pub fn print_text(&self, seps: &Separators) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_text(seps, &mut out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::page_rounded_size;
    use std::io::Write as _;

    fn text_region(contents: &[u8]) -> (tempfile::NamedTempFile, MappedRegion) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        let size = page_rounded_size(file.path()).unwrap();
        let region = MappedRegion::open_file(file.path(), "r", size).unwrap();
        (file, region)
    }

    fn normalized(contents: &[u8]) -> Vec<u8> {
        let (_file, region) = text_region(contents);
        let mut out = Vec::new();
        region
            .write_text(&Separators::default(), &mut out)
            .unwrap();
        out
    }

    #[test]
    fn redundant_separators_collapse() {
        assert_eq!(normalized(b"1,, 2\n"), b"1,2\n");
    }

    #[test]
    fn clean_text_round_trips() {
        assert_eq!(normalized(b"1,2,3\n4,5,6\n"), b"1,2,3\n4,5,6\n");
    }

    #[test]
    fn leading_separators_are_stripped() {
        assert_eq!(normalized(b" \t1 2\n"), b"1 2\n");
    }

    #[test]
    fn end_of_buffer_terminates_with_a_line_break() {
        assert_eq!(normalized(b"1,2"), b"1,2\n");
    }

    #[test]
    fn trailing_run_emits_nothing_after_the_last_token() {
        // the token keeps its terminating separator, the rest of the
        // run vanishes
        assert_eq!(normalized(b"3,,\n"), b"3,");
    }

    #[test]
    fn separator_only_text_emits_nothing() {
        assert_eq!(normalized(b" ,,\t\n"), b"");
        assert_eq!(normalized(b""), b"");
    }

    #[test]
    fn stops_at_null_padding() {
        let (_file, region) = text_region(b"1,2\n");
        // mapped length exceeds logical length; the walk must not read
        // the zero padding as data
        assert!(region.mapped_len() as u64 > region.logical_len());
        let mut out = Vec::new();
        region
            .write_text(&Separators::default(), &mut out)
            .unwrap();
        assert_eq!(out, b"1,2\n");
    }
}
