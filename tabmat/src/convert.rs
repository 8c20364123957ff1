//! Text to matrix conversion
//!
//! Conversion is two-phase: the counting pass sizes the destination
//! exactly, then the fill pass walks the mapped text once and stores
//! each parsed value straight into the destination mapping. The fill
//! pass is bounded by the source's logical length, so the zero padding
//! between it and the mapped length is never parsed as data.

use std::mem;
use std::path::Path;

use log::debug;
use tabmat_core::{float_prefix, Separators};

use crate::error::{Result, TabmatError};
use crate::region::{ContentKind, MappedRegion};
use crate::scanner::ScanConfig;
use crate::sizing::round_to_pages;

impl MappedRegion {
    /// Convert the region's text into a row-major f64 matrix region
    ///
    /// With a destination path the matrix is written through a shared
    /// file mapping and flushed before returning; without one it lives
    /// in anonymous memory. The returned region is tagged
    /// [`ContentKind::DoubleMatrix`] and carries the discovered
    /// dimensions; it keeps no reference to the source.
    ///
    /// A token that does not parse as a number stores 0.0 and the scan
    /// moves on, matching the strtod contract of classic converters.
    pub fn to_double_matrix(
        &mut self,
        dest_path: Option<&Path>,
        config: &ScanConfig,
    ) -> Result<MappedRegion> {
        let fields = self.text_fields(config)?;
        let records = self.text_records(config)?;

        let required = (fields as u64)
            .checked_mul(records)
            .and_then(|n| n.checked_mul(mem::size_of::<f64>() as u64))
            .ok_or(TabmatError::SizeOverflow)?;
        let required_len: usize = required.try_into().map_err(|_| TabmatError::SizeOverflow)?;
        let mapped = round_to_pages(required);

        let mut dest = match dest_path {
            Some(path) => MappedRegion::open_file(path, "w", mapped)?,
            None => MappedRegion::map_anonymous(mapped)?,
        };

        let bound = self.logical_len().min(self.mapped_len() as u64) as usize;
        {
            let text = &self.as_bytes()[..bound];
            let dest_bytes = dest.as_bytes_mut()?;
            let matrix: &mut [f64] = bytemuck::cast_slice_mut(&mut dest_bytes[..required_len]);
            fill_matrix(matrix, text, fields, records, &config.separators);
        }

        dest.flush()?;
        dest.set_kind(ContentKind::DoubleMatrix);
        dest.fields = Some(fields);
        dest.records = Some(records);

        debug!("converted {records} records x {fields} fields ({required} bytes)");
        Ok(dest)
    }
}

/// Walk the text once and store each token at `row * fields + col`
///
/// Separators are consumed one at a time, so a run collapses across
/// iterations and never produces a phantom field. A null byte closes
/// any open record; null runs between records are skipped. The walk
/// stops once `records` rows are filled or the text is exhausted.
fn fill_matrix(matrix: &mut [f64], text: &[u8], fields: usize, records: u64, seps: &Separators) {
    let end = text.len();
    let mut cur = 0usize;
    let mut row = 0u64;
    let mut col = 0usize;

    while row < records && cur < end {
        let byte = text[cur];

        if byte == 0 {
            if col > 0 {
                row += 1;
                col = 0;
            }
            cur += 1;
            continue;
        }

        if seps.contains(byte) {
            cur += 1;
            continue;
        }

        let (value, len) = match float_prefix(&text[cur..]) {
            Some(hit) => hit,
            // strtod failure value; the cursor still advances below
            None => (0.0, 0),
        };
        matrix[(row as usize) * fields + col] = value;
        col += 1;
        // step past the token and the byte that terminated it
        cur += len + 1;
        if col == fields {
            col = 0;
            row += 1;
        }
    }
}
