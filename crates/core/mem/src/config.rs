//! Allocator configuration
//!
//! Geometry and policies are fixed when a [`PagedMemory`](crate::PagedMemory)
//! is constructed. `initialize` resets state but never the configuration.

use crate::error::{MemError, MemResult};
use crate::layout::{self, DEFAULT_PAGE_SIZE, DEFAULT_TOTAL_MEMORY};

/// How `allocate` treats a name that is already live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamePolicy {
    /// Same-named segments coexist; `deallocate` removes all of them
    #[default]
    AllowDuplicates,
    /// A live name rejects further allocations with `NameConflict`
    Unique,
}

/// What `external_fragmentation` counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExternalPolicy {
    /// Every free byte
    #[default]
    TotalFree,
    /// Free bytes outside the largest contiguous free run
    OutsideLargestRun,
}

/// Memory geometry and allocation policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Simulated memory size in bytes
    pub total_memory: usize,
    /// Bytes per page
    pub page_size: usize,
    /// Whether live segment names may repeat
    pub names: NamePolicy,
    /// What external fragmentation counts
    pub external: ExternalPolicy,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            total_memory: DEFAULT_TOTAL_MEMORY,
            page_size: DEFAULT_PAGE_SIZE,
            names: NamePolicy::default(),
            external: ExternalPolicy::default(),
        }
    }
}

impl MemoryConfig {
    pub fn new(total_memory: usize, page_size: usize) -> Self {
        Self {
            total_memory,
            page_size,
            ..Self::default()
        }
    }

    pub fn with_name_policy(mut self, names: NamePolicy) -> Self {
        self.names = names;
        self
    }

    pub fn with_external_policy(mut self, external: ExternalPolicy) -> Self {
        self.external = external;
        self
    }

    /// Reject geometries the page arithmetic cannot handle
    pub fn validate(&self) -> MemResult<()> {
        if self.page_size == 0 {
            return Err(MemError::InvalidConfig("page size must be non-zero"));
        }
        if self.total_memory == 0 {
            return Err(MemError::InvalidConfig("total memory must be non-zero"));
        }
        if self.total_pages() > layout::MAX_PAGES {
            return Err(MemError::InvalidConfig("too many pages"));
        }
        if layout::checked_bytes_of(self.total_pages(), self.page_size).is_none() {
            return Err(MemError::InvalidConfig("address space overflows"));
        }
        Ok(())
    }

    /// `ceil(total_memory / page_size)`
    pub fn total_pages(&self) -> usize {
        layout::pages_needed(self.total_memory, self.page_size)
    }

    /// Highest address plus one that maps to a page
    ///
    /// Saturates for geometries `validate` rejects.
    pub fn address_limit(&self) -> usize {
        layout::checked_bytes_of(self.total_pages(), self.page_size).unwrap_or(usize::MAX)
    }
}
