//! Tabmat - Memory-Mapped Matrix I/O for Delimited Numeric Text
//!
//! This library provides a uniform mapped-buffer abstraction over disk
//! files and anonymous memory, a converter that parses delimited numeric
//! text into a dense row-major f64 matrix, and a printer that re-emits
//! normalized delimited text. It lets numeric tools treat large text
//! tables as binary arrays without staging them through buffered reads.
//!
//! ## Architecture
//!
//! Tabmat follows a clean rules/implementation separation:
//!
//! - **tabmat-core**: pure scanning rules with no I/O (separator sets,
//!   line classification, field counting, numeric token extraction)
//! - **tabmat**: mapped-region lifecycle, counting, conversion, printing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabmat::{MappedRegion, ScanConfig};
//!
//! fn example() -> tabmat::Result<()> {
//!     let config = ScanConfig::default();
//!     let size = tabmat::page_rounded_size("table.txt")?;
//!     let mut text = MappedRegion::open_text("table.txt", "r", size, &config)?;
//!
//!     let matrix = text.to_double_matrix(None, &config)?;
//!     let (fields, records) = matrix.matrix_dims().unwrap();
//!     println!("{records} x {fields}: first value {}", matrix.matrix_values()?[0]);
//!
//!     matrix.close()?;
//!     text.close()
//! }
//! ```
//!
//! ## Sizing discipline
//!
//! Mappings are sized in whole pages through [`page_rounded_size`],
//! which always adds at least one page past the logical file length.
//! Every scan is bounded by the logical length, so the zero padding in
//! the final pages is never read as data. The binary matrix output is
//! header-less: exactly `fields * records * 8` bytes of row-major f64,
//! with the dimensions carried only on the in-memory region.

// Re-export the pure scanning rules
pub use tabmat_core::{classify_line, count_fields, float_prefix, LineKind, Separators};

// Implementation modules
pub mod convert;
pub mod error;
pub mod printer;
pub mod region;
pub mod scanner;
pub mod sizing;

// Public exports
pub use error::{Result, TabmatError};
pub use region::{ContentKind, MappedRegion};
pub use scanner::ScanConfig;
pub use sizing::{logical_file_size, page_rounded_size, page_size, round_to_pages};
