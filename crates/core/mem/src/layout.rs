//! pagesim Memory Layout - Single Source of Truth
//!
//! Default geometry and the page arithmetic every other module uses.
//! NO magic numbers anywhere else in the crate.
//!
//! # Default Geometry
//!
//! ```text
//! 0x000 - 0x03F   Page 0      64 bytes
//! 0x040 - 0x07F   Page 1      64 bytes
//! ...
//! 0x3C0 - 0x3FF   Page 15     64 bytes
//! ```

// =============================================================================
// Defaults
// =============================================================================

/// Default simulated memory size (1 KiB)
pub const DEFAULT_TOTAL_MEMORY: usize = 1024;

/// Default page size (64 bytes)
pub const DEFAULT_PAGE_SIZE: usize = 64;

/// Page count of the default geometry
pub const DEFAULT_TOTAL_PAGES: usize = pages_needed(DEFAULT_TOTAL_MEMORY, DEFAULT_PAGE_SIZE);

// =============================================================================
// Limits
// =============================================================================

/// Largest page table a configuration may ask for (1M pages)
pub const MAX_PAGES: usize = 1 << 20;

// =============================================================================
// Helper Functions
// =============================================================================

/// Calculate number of pages needed for a byte size
///
/// `page_size` must be non-zero.
#[inline]
pub const fn pages_needed(size: usize, page_size: usize) -> usize {
    size.div_ceil(page_size)
}

/// Get page index from a byte address
#[inline]
pub const fn page_of(addr: usize, page_size: usize) -> usize {
    addr / page_size
}

/// Offset of a byte address within its page
#[inline]
pub const fn offset_in_page(addr: usize, page_size: usize) -> usize {
    addr % page_size
}

/// Get first byte address of a page index
#[inline]
pub const fn addr_of(page: usize, page_size: usize) -> usize {
    page * page_size
}

/// Bytes reserved by `pages` whole pages
#[inline]
pub const fn bytes_of(pages: usize, page_size: usize) -> usize {
    pages * page_size
}

/// `bytes_of`, or `None` when the product overflows
#[inline]
pub const fn checked_bytes_of(pages: usize, page_size: usize) -> Option<usize> {
    pages.checked_mul(page_size)
}
