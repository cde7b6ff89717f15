//! Locked Allocator
//!
//! Wraps a [`PagedMemory`] in a `spin::Mutex` so it can be shared between
//! callers. Each convenience method holds the lock for the whole operation,
//! so no caller ever observes a half-applied `allocate` or `compact`.

use alloc::vec::Vec;
use spin::{Mutex, MutexGuard};

use crate::config::MemoryConfig;
use crate::error::MemResult;
use crate::pmm::{MemoryStats, PageHit, PagedMemory, Released};
use crate::snapshot::Snapshot;

/// Shareable allocator behind one mutual-exclusion boundary
#[derive(Debug)]
pub struct LockedMemory(Mutex<PagedMemory>);

impl Default for LockedMemory {
    fn default() -> Self {
        Self::from_memory(PagedMemory::default())
    }
}

impl LockedMemory {
    /// Build and validate a fresh allocator
    pub fn new(config: MemoryConfig) -> MemResult<Self> {
        PagedMemory::new(config).map(Self::from_memory)
    }

    pub const fn from_memory(memory: PagedMemory) -> Self {
        Self(Mutex::new(memory))
    }

    /// Hold the lock across several operations
    ///
    /// # Example
    ///
    /// ```
    /// use pagesim_mem::LockedMemory;
    ///
    /// let shared = LockedMemory::default();
    /// {
    ///     let mut mem = shared.lock();
    ///     mem.allocate("A", 100).unwrap();
    ///     mem.compact();
    /// }
    /// assert_eq!(shared.stats().allocations, 1);
    /// ```
    pub fn lock(&self) -> MutexGuard<'_, PagedMemory> {
        self.0.lock()
    }

    pub fn into_inner(self) -> PagedMemory {
        self.0.into_inner()
    }

    pub fn initialize(&self) {
        self.lock().initialize();
    }

    pub fn allocate(&self, name: &str, size: usize) -> MemResult<Vec<usize>> {
        self.lock().allocate(name, size)
    }

    pub fn deallocate(&self, name: &str) -> Released {
        self.lock().deallocate(name)
    }

    pub fn access_address(&self, addr: usize) -> MemResult<PageHit> {
        self.lock().access_address(addr)
    }

    pub fn compact(&self) -> usize {
        self.lock().compact()
    }

    pub fn stats(&self) -> MemoryStats {
        self.lock().stats()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}
