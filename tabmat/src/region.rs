//! Memory-mapped region lifecycle
//!
//! A `MappedRegion` owns one contiguous mapping backed by a disk file or
//! by anonymous memory, together with the bookkeeping the scanners and
//! the converter rely on: the backing path, the logical (un-rounded)
//! length, the content kind, and the memoized field/record counts.
//!
//! The mapped length is whatever the caller requested, normally the
//! page-rounded size from [`crate::sizing`]; the logical length is the
//! byte extent that actually holds data. Every scan in this crate is
//! bounded by the logical length, so the zero-filled page padding past
//! it is never read as content.
//!
//! Construction is all-or-nothing: the mapping, the file handle, and the
//! path are owned by the region, and any early return during
//! construction releases exactly the resources acquired so far.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use log::debug;
use memmap2::{Mmap, MmapMut, MmapOptions};

use crate::error::{Result, TabmatError};
use crate::scanner::ScanConfig;

/// Content carried by a mapped region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Uninterpreted bytes
    Raw,
    /// Delimited numeric text
    Text,
    /// Row-major f64 matrix
    DoubleMatrix,
}

enum MapInner {
    ReadOnly(Mmap),
    Writable(MmapMut),
}

enum Backing {
    File {
        path: PathBuf,
        // Keeps the descriptor open for the lifetime of the region
        _file: File,
        shared: bool,
    },
    Anonymous,
}

/// One mapped span of memory backed by a file or anonymous storage
pub struct MappedRegion {
    map: MapInner,
    backing: Backing,
    kind: ContentKind,
    logical_len: u64,
    pub(crate) fields: Option<usize>,
    pub(crate) records: Option<u64>,
}

impl MappedRegion {
    /// Map `size` bytes of the file at `path`
    ///
    /// Mode `"r"` opens the file read-only and maps it private
    /// copy-on-write, so the backing file can never be modified through
    /// the region. Any other mode opens read-write (modes starting with
    /// `w` truncate first, creating the file as needed) and maps shared;
    /// the file is extended to `size` bytes so the whole mapping is
    /// file-backed.
    pub fn open_file<P: AsRef<Path>>(path: P, mode: &str, size: u64) -> Result<Self> {
        let path = path.as_ref();
        let map_len: usize = size.try_into().map_err(|_| TabmatError::SizeOverflow)?;

        if mode == "r" {
            let file = File::open(path).map_err(TabmatError::Open)?;
            let logical_len = file.metadata().map_err(TabmatError::Stat)?.len();

            // SAFETY: mapping file memory bypasses the borrow checker's
            // view of the file contents. This is safe because:
            // 1. The mapping is private copy-on-write, so nothing written
            //    through it can reach the backing file
            // 2. The region owns the file handle for the mapping's lifetime
            // 3. All access goes through bounds-checked slices, and scans
            //    are additionally bounded by the logical length
            let map = unsafe { MmapOptions::new().len(map_len).map_copy_read_only(&file) }
                .map_err(TabmatError::Map)?;

            debug!(
                "mapped '{}' read-only: {} bytes ({} logical)",
                path.display(),
                map_len,
                logical_len
            );
            return Ok(Self {
                map: MapInner::ReadOnly(map),
                backing: Backing::File {
                    path: path.to_path_buf(),
                    _file: file,
                    shared: false,
                },
                kind: ContentKind::Raw,
                logical_len,
                fields: None,
                records: None,
            });
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(mode.starts_with('w'))
            .open(path)
            .map_err(TabmatError::Open)?;

        // every mapped page must be file-backed before the first store
        let existing = file.metadata().map_err(TabmatError::Stat)?.len();
        if existing < size {
            file.set_len(size).map_err(TabmatError::Open)?;
        }
        let logical_len = existing.max(size);

        // SAFETY: mapping file memory shared and mutable is unsafe
        // because external writers could race the mapping. This is safe
        // because:
        // 1. The file was extended to at least map_len before mapping
        // 2. The region owns the file handle for the mapping's lifetime
        // 3. Concurrent mutation of one region is a documented caller
        //    precondition, and all access is bounds-checked slice access
        let map = unsafe { MmapOptions::new().len(map_len).map_mut(&file) }
            .map_err(TabmatError::Map)?;

        debug!(
            "mapped '{}' shared: {} bytes ({} logical)",
            path.display(),
            map_len,
            logical_len
        );
        Ok(Self {
            map: MapInner::Writable(map),
            backing: Backing::File {
                path: path.to_path_buf(),
                _file: file,
                shared: true,
            },
            kind: ContentKind::Raw,
            logical_len,
            fields: None,
            records: None,
        })
    }

    /// Map a text file and warm its field/record caches
    ///
    /// A file without any data line simply leaves the caches unset; the
    /// counting errors resurface on the next explicit query.
    pub fn open_text<P: AsRef<Path>>(
        path: P,
        mode: &str,
        size: u64,
        config: &ScanConfig,
    ) -> Result<Self> {
        let mut region = Self::open_file(path, mode, size)?;
        region.kind = ContentKind::Text;
        let _ = region.text_fields(config);
        let _ = region.text_records(config);
        Ok(region)
    }

    /// Map `size` bytes of private, zero-initialized anonymous memory
    pub fn map_anonymous(size: u64) -> Result<Self> {
        let map_len: usize = size.try_into().map_err(|_| TabmatError::SizeOverflow)?;
        let map = MmapMut::map_anon(map_len).map_err(TabmatError::Allocation)?;

        debug!("mapped {map_len} anonymous bytes");
        Ok(Self {
            map: MapInner::Writable(map),
            backing: Backing::Anonymous,
            kind: ContentKind::Raw,
            logical_len: size,
            fields: None,
            records: None,
        })
    }

    /// Synchronously flush dirty pages to the backing file
    ///
    /// A no-op for anonymous and read-only regions, which have nothing
    /// to write back.
    pub fn flush(&self) -> Result<()> {
        match (&self.map, &self.backing) {
            (MapInner::Writable(map), Backing::File { path, .. }) => {
                debug!("flushing '{}'", path.display());
                map.flush().map_err(TabmatError::Flush)
            }
            _ => Ok(()),
        }
    }

    /// Flush shared content, then unmap and release every owned resource
    ///
    /// Dropping a region without calling `close` performs the same
    /// release, just without surfacing flush errors.
    pub fn close(self) -> Result<()> {
        self.flush()
    }

    /// The mapped bytes, padding included
    pub fn as_bytes(&self) -> &[u8] {
        match &self.map {
            MapInner::ReadOnly(map) => map,
            MapInner::Writable(map) => map,
        }
    }

    /// Mutable view of the mapped bytes
    pub fn as_bytes_mut(&mut self) -> Result<&mut [u8]> {
        match &mut self.map {
            MapInner::Writable(map) => Ok(&mut map[..]),
            MapInner::ReadOnly(_) => Err(TabmatError::ReadOnly),
        }
    }

    /// Base address of the mapping
    pub fn as_ptr(&self) -> *const u8 {
        self.as_bytes().as_ptr()
    }

    /// Mapped length in bytes, always the size requested at creation
    pub fn mapped_len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Logical data length in bytes, never larger than the mapped length
    /// for regions sized through the page-rounding helpers
    pub fn logical_len(&self) -> u64 {
        self.logical_len
    }

    /// What the region's bytes hold
    pub fn content_kind(&self) -> ContentKind {
        self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: ContentKind) {
        self.kind = kind;
    }

    /// Backing file path, `None` for anonymous regions
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File { path, .. } => Some(path),
            Backing::Anonymous => None,
        }
    }

    /// Whether writes through the region reach other mappers of the file
    pub fn is_shared(&self) -> bool {
        matches!(self.backing, Backing::File { shared: true, .. })
    }

    /// Forget both memoized counts so the next query re-reads the file
    pub fn invalidate_counts(&mut self) {
        self.fields = None;
        self.records = None;
    }

    /// Cached field and record counts, once both are known
    pub fn matrix_dims(&self) -> Option<(usize, u64)> {
        match (self.fields, self.records) {
            (Some(fields), Some(records)) => Some((fields, records)),
            _ => None,
        }
    }

    /// Typed view of a converted matrix region
    ///
    /// The slice covers exactly `fields * records` values; the page
    /// padding past it is not exposed.
    pub fn matrix_values(&self) -> Result<&[f64]> {
        if self.kind != ContentKind::DoubleMatrix {
            return Err(TabmatError::NotDoubleMatrix);
        }
        let (fields, records) = self.matrix_dims().ok_or(TabmatError::NotDoubleMatrix)?;
        let byte_len = (fields as u64)
            .checked_mul(records)
            .and_then(|n| n.checked_mul(core::mem::size_of::<f64>() as u64))
            .ok_or(TabmatError::SizeOverflow)?;
        let byte_len: usize = byte_len.try_into().map_err(|_| TabmatError::SizeOverflow)?;
        Ok(bytemuck::cast_slice(&self.as_bytes()[..byte_len]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::{page_rounded_size, page_size};
    use std::io::Write;

    fn write_temp(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn read_only_region_exposes_file_bytes() {
        let file = write_temp(b"1,2,3\n");
        let size = page_rounded_size(file.path()).unwrap();
        let region = MappedRegion::open_file(file.path(), "r", size).unwrap();

        assert_eq!(region.mapped_len() as u64, size);
        assert_eq!(region.logical_len(), 6);
        assert_eq!(&region.as_bytes()[..6], b"1,2,3\n");
        assert_eq!(region.content_kind(), ContentKind::Raw);
        assert!(!region.is_shared());
        assert!(!region.as_ptr().is_null());
        // the padding past the logical length is zero-filled
        assert_eq!(region.as_bytes()[6], 0);
    }

    #[test]
    fn read_only_region_refuses_mutation() {
        let file = write_temp(b"data\n");
        let size = page_rounded_size(file.path()).unwrap();
        let mut region = MappedRegion::open_file(file.path(), "r", size).unwrap();
        assert!(matches!(
            region.as_bytes_mut(),
            Err(TabmatError::ReadOnly)
        ));
        region.close().unwrap();
    }

    #[test]
    fn shared_region_writes_reach_the_file() {
        let file = write_temp(b"abcdef");
        let size = page_rounded_size(file.path()).unwrap();
        let mut region = MappedRegion::open_file(file.path(), "r+", size).unwrap();
        assert!(region.is_shared());

        region.as_bytes_mut().unwrap()[..3].copy_from_slice(b"XYZ");
        region.close().unwrap();

        let written = std::fs::read(file.path()).unwrap();
        assert_eq!(&written[..6], b"XYZdef");
        // the writable mapping extended the file to the mapped size
        assert_eq!(written.len() as u64, size);
    }

    #[test]
    fn write_mode_truncates() {
        let file = write_temp(b"old contents");
        let size = page_size() as u64;
        let region = MappedRegion::open_file(file.path(), "w", size).unwrap();
        assert_eq!(region.logical_len(), size);
        assert_eq!(region.as_bytes()[0], 0);
        region.close().unwrap();
    }

    #[test]
    fn open_failure_on_missing_file() {
        assert!(matches!(
            MappedRegion::open_file("/no/such/tabmat/file", "r", 4096),
            Err(TabmatError::Open(_))
        ));
    }

    #[test]
    fn anonymous_region_is_zeroed_and_pathless() {
        let region = MappedRegion::map_anonymous(1024).unwrap();
        assert!(region.mapped_len() >= 1024);
        assert!(region.as_bytes()[..1024].iter().all(|&b| b == 0));
        assert!(region.path().is_none());
        assert!(!region.is_shared());
        // close never flushes an anonymous region
        region.close().unwrap();
    }

    #[test]
    fn anonymous_region_is_writable() {
        let mut region = MappedRegion::map_anonymous(64).unwrap();
        region.as_bytes_mut().unwrap()[0] = 7;
        assert_eq!(region.as_bytes()[0], 7);
    }

    #[test]
    fn matrix_access_requires_matrix_kind() {
        let region = MappedRegion::map_anonymous(64).unwrap();
        assert!(matches!(
            region.matrix_values(),
            Err(TabmatError::NotDoubleMatrix)
        ));
        assert!(region.matrix_dims().is_none());
    }
}
