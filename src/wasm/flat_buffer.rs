//! Flat buffer protocol for zero-copy WASM bridge
//!
//! Binary format for page ranges:
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x50475247 = "PGRG" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     page_count
//! [3]     block_count
//! [4..]   page data...
//!
//! Per-page: [start_index, end_index, flags, used_height]
//!   flags: bit0=oversized
//!   used_height: saturates at u32::MAX
//! ```

use crate::layout::{PageInfo, PageRange, Pagination};
use thiserror::Error;

/// Magic number for format validation: "PGRG" (PaGe RanGes)
pub const MAGIC: u32 = 0x50475247;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 4;

/// Number of u32 values per page
pub const U32_PER_PAGE: usize = 4;

/// Flags bitmask
pub const FLAG_OVERSIZED: u32 = 0b0001;

/// Problems reading a range buffer back
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("buffer of {0} values is shorter than its header")]
    TooShort(usize),
    #[error("bad magic number {0:#010x}")]
    BadMagic(u32),
    #[error("unsupported schema version {0}")]
    UnsupportedSchema(u32),
    #[error("buffer declares {pages} pages but holds {len} values")]
    Truncated { pages: usize, len: usize },
}

/// Range buffer for zero-copy WASM transfer
#[derive(Debug, Default)]
pub struct RangeBuffer {
    /// Integer data (header + per-page records)
    pub u32_data: Vec<u32>,
}

impl RangeBuffer {
    pub fn new() -> Self {
        Self {
            u32_data: Vec::with_capacity(HEADER_SIZE + 16 * U32_PER_PAGE),
        }
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
    }

    /// Rewrite the buffer from a pagination pass.
    ///
    /// Capacity is reserved up front; JS views into the previous allocation
    /// must be re-created after every write.
    pub fn write(&mut self, pagination: &Pagination) {
        let needed = HEADER_SIZE + pagination.page_count() * U32_PER_PAGE;
        self.u32_data.clear();
        self.u32_data.reserve(needed);

        self.u32_data.push(MAGIC);
        self.u32_data.push(SCHEMA_VERSION);
        self.u32_data.push(pagination.page_count() as u32);
        self.u32_data.push(pagination.block_count() as u32);

        for page in pagination.pages() {
            self.write_page(page);
        }
    }

    fn write_page(&mut self, page: &PageInfo) {
        let flags = if page.oversized { FLAG_OVERSIZED } else { 0 };
        self.u32_data.push(page.range.start_index as u32);
        self.u32_data.push(page.range.end_index as u32);
        self.u32_data.push(flags);
        self.u32_data.push(u32::try_from(page.used_height).unwrap_or(u32::MAX));
    }

    pub fn page_count(&self) -> usize {
        self.u32_data.get(2).map_or(0, |&n| n as usize)
    }

    pub fn u32_ptr(&self) -> u32 {
        self.u32_data.as_ptr() as u32
    }

    pub fn u32_len(&self) -> u32 {
        self.u32_data.len() as u32
    }
}

/// Read page ranges and oversized flags back out of a buffer
pub fn decode_pages(data: &[u32]) -> Result<Vec<(PageRange, bool)>, BufferError> {
    if data.len() < HEADER_SIZE {
        return Err(BufferError::TooShort(data.len()));
    }
    if data[0] != MAGIC {
        return Err(BufferError::BadMagic(data[0]));
    }
    if data[1] != SCHEMA_VERSION {
        return Err(BufferError::UnsupportedSchema(data[1]));
    }

    let pages = data[2] as usize;
    let body = &data[HEADER_SIZE..];
    if body.len() < pages * U32_PER_PAGE {
        return Err(BufferError::Truncated {
            pages,
            len: data.len(),
        });
    }

    Ok(body
        .chunks_exact(U32_PER_PAGE)
        .take(pages)
        .map(|record| {
            let range = PageRange {
                start_index: record[0] as usize,
                end_index: record[1] as usize,
            };
            (range, record[2] & FLAG_OVERSIZED != 0)
        })
        .collect())
}

/// Read only the page ranges
pub fn decode_ranges(data: &[u32]) -> Result<Vec<PageRange>, BufferError> {
    Ok(decode_pages(data)?.into_iter().map(|(range, _)| range).collect())
}
