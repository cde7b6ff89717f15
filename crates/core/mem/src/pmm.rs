//! Paged Memory Manager
//!
//! Owns the page table and the segment registry. Pages are claimed first-fit
//! in ascending index order, so a segment spans scattered pages once memory
//! is fragmented. `compact` repacks the table and rewrites every segment's
//! page list in the same call.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use log::{info, warn};

use crate::config::{MemoryConfig, NamePolicy};
use crate::error::{MemError, MemResult};
use crate::layout;
use crate::page::{Page, Segment, SegmentId};

/// Allocation counters
///
/// Zeroed by `initialize`, monotonically non-decreasing otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Successful allocations
    pub allocations: u64,
    /// Deallocate calls, matched or not
    pub deallocations: u64,
    /// Failed allocations plus accesses to free pages
    pub page_faults: u64,
}

/// Page occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageUsage {
    pub total_pages: usize,
    pub used_pages: usize,
    pub free_pages: usize,
    pub page_size: usize,
    pub total_bytes: usize,
    pub free_bytes: usize,
}

impl PageUsage {
    /// Get usage percentage (0-100)
    pub fn usage_percent(&self) -> u8 {
        if self.total_pages == 0 {
            return 0;
        }
        ((self.used_pages * 100) / self.total_pages) as u8
    }
}

/// Successful address probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHit {
    pub page: usize,
    /// Byte offset within the page
    pub offset: usize,
    /// Name of the owning segment
    pub owner: String,
}

/// What a `deallocate` call reclaimed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Released {
    pub segments: usize,
    pub pages: usize,
}

/// Paged memory allocator
#[derive(Debug, Clone)]
pub struct PagedMemory {
    config: MemoryConfig,
    pages: Vec<Page>,
    segments: Vec<Segment>,
    stats: MemoryStats,
    next_id: u64,
}

impl Default for PagedMemory {
    fn default() -> Self {
        Self::build(MemoryConfig::default())
    }
}

impl PagedMemory {
    /// Create an allocator with every page free
    pub fn new(config: MemoryConfig) -> MemResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: MemoryConfig) -> Self {
        let mut mem = Self {
            config,
            pages: Vec::new(),
            segments: Vec::new(),
            stats: MemoryStats::default(),
            next_id: 0,
        };
        mem.initialize();
        mem
    }

    /// Cold restart: free every page, drop every segment, zero the counters
    pub fn initialize(&mut self) {
        let total = self.config.total_pages();
        self.pages.clear();
        self.pages.resize(total, Page::FREE);
        self.segments.clear();
        self.stats = MemoryStats::default();
        self.next_id = 0;
        info!(
            "memory initialized: {} pages of {} bytes",
            total, self.config.page_size
        );
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Page table in physical order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Segment registry in allocation order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First live segment with this name
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|seg| seg.name() == name)
    }

    pub fn segment_by_id(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|seg| seg.id() == id)
    }

    /// Name of the segment owning a page, `None` when free or out of range
    pub fn owner_name(&self, index: usize) -> Option<&str> {
        let id = self.pages.get(index)?.owner()?;
        self.segment_by_id(id).map(Segment::name)
    }

    pub fn free_pages(&self) -> usize {
        self.pages.iter().filter(|page| !page.is_allocated()).count()
    }

    pub fn stats(&self) -> MemoryStats {
        self.stats
    }

    pub fn usage(&self) -> PageUsage {
        let free = self.free_pages();
        let total = self.pages.len();
        PageUsage {
            total_pages: total,
            used_pages: total - free,
            free_pages: free,
            page_size: self.config.page_size,
            total_bytes: layout::bytes_of(total, self.config.page_size),
            free_bytes: layout::bytes_of(free, self.config.page_size),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Claim `ceil(size / page_size)` free pages for a new segment
    ///
    /// Returns the claimed page indices in ascending order. A shortfall of
    /// free pages counts as a page fault and leaves everything else untouched.
    pub fn allocate(&mut self, name: &str, size: usize) -> MemResult<Vec<usize>> {
        if name.is_empty() {
            warn!("allocate rejected: empty segment name");
            return Err(MemError::InvalidRequest("segment name is empty"));
        }
        if size == 0 {
            warn!("allocate {} rejected: zero size", name);
            return Err(MemError::InvalidRequest("size must be positive"));
        }
        if self.config.names == NamePolicy::Unique && self.segment(name).is_some() {
            warn!("allocate {} rejected: name in use", name);
            return Err(MemError::NameConflict(name.into()));
        }

        let needed = layout::pages_needed(size, self.config.page_size);
        let free = self.free_pages();
        if free < needed {
            self.stats.page_faults += 1;
            warn!(
                "allocate {} failed: {} pages needed, {} free",
                name, needed, free
            );
            return Err(MemError::InsufficientMemory { needed, free });
        }

        let id = SegmentId::new(self.next_id);
        self.next_id += 1;

        let claimed: Vec<usize> = self
            .pages
            .iter()
            .enumerate()
            .filter(|(_, page)| !page.is_allocated())
            .map(|(index, _)| index)
            .take(needed)
            .collect();

        for &index in &claimed {
            self.pages[index] = Page::owned_by(id);
            debug_mem!("page {} -> {} ({})", index, name, id);
        }

        self.segments
            .push(Segment::new(id, name.into(), size, claimed.clone()));
        self.stats.allocations += 1;
        info!("allocated {} ({} bytes) on {} pages", name, size, needed);

        Ok(claimed)
    }

    /// Remove every segment with this name and free its pages
    ///
    /// Never fails; an unknown name still counts as a deallocation.
    pub fn deallocate(&mut self, name: &str) -> Released {
        self.stats.deallocations += 1;

        let pages = &mut self.pages;
        let mut released = Released::default();
        self.segments.retain(|seg| {
            if seg.name() != name {
                return true;
            }
            for &index in seg.pages() {
                pages[index] = Page::FREE;
                debug_mem!("page {} freed from {}", index, name);
            }
            released.segments += 1;
            released.pages += seg.page_count();
            false
        });

        if released.segments == 0 {
            info!("deallocate {}: no such segment", name);
        } else {
            info!(
                "deallocated {}: {} segments, {} pages",
                name, released.segments, released.pages
            );
        }
        released
    }

    /// Probe a byte address
    ///
    /// A free page is a page fault and is counted; an address past the last
    /// page is an error but not a fault.
    pub fn access_address(&mut self, addr: usize) -> MemResult<PageHit> {
        let page_size = self.config.page_size;
        let page = layout::page_of(addr, page_size);

        let Some(entry) = self.pages.get(page).copied() else {
            warn!("access {:#x} out of range", addr);
            return Err(MemError::AddressOutOfRange {
                addr,
                limit: self.config.address_limit(),
            });
        };

        let Some(id) = entry.owner() else {
            self.stats.page_faults += 1;
            warn!("page fault: access {:#x} hit free page {}", addr, page);
            return Err(MemError::PageFault { page });
        };

        let owner = self
            .segment_by_id(id)
            .map(|seg| String::from(seg.name()))
            .ok_or(MemError::Corrupted("page owner missing from registry"))?;

        debug_mem!("access {:#x} -> page {} ({})", addr, page, owner);
        Ok(PageHit {
            page,
            offset: layout::offset_in_page(addr, page_size),
            owner,
        })
    }

    /// Move allocated pages to the front, one contiguous block per segment
    ///
    /// Segments are laid out in the order their first page appears, so
    /// segments that were not interleaved keep their relative page order.
    /// Segment page lists are rewritten in the same call. Returns the number
    /// of allocated pages that changed index.
    pub fn compact(&mut self) -> usize {
        let slots: BTreeMap<SegmentId, usize> = self
            .segments
            .iter()
            .enumerate()
            .map(|(slot, seg)| (seg.id(), slot))
            .collect();

        let mut seen = Vec::new();
        seen.resize(self.segments.len(), false);
        let mut order = Vec::with_capacity(self.segments.len());
        for page in &self.pages {
            if let Some(&slot) = page.owner().and_then(|id| slots.get(&id)) {
                if !seen[slot] {
                    seen[slot] = true;
                    order.push(slot);
                }
            }
        }

        let mut packed = Vec::with_capacity(self.pages.len());
        let mut moved = 0;
        for slot in order {
            let seg = &mut self.segments[slot];
            let owner = Page::owned_by(seg.id());
            for index in seg.pages_mut().iter_mut() {
                let target = packed.len();
                if *index != target {
                    debug_mem!("page {} -> {}", *index, target);
                    moved += 1;
                }
                *index = target;
                packed.push(owner);
            }
        }
        packed.resize(self.pages.len(), Page::FREE);

        self.pages = packed;
        info!("compacted memory: {} pages moved", moved);
        moved
    }

    // =========================================================================
    // Consistency
    // =========================================================================

    /// Verify the page table and segment registry describe the same ownership
    pub fn check_invariants(&self) -> MemResult<()> {
        if self.pages.len() != self.config.total_pages() {
            return Err(MemError::Corrupted("page table length changed"));
        }

        let mut listed = 0;
        for (pos, seg) in self.segments.iter().enumerate() {
            if self.segments[..pos].iter().any(|other| other.id() == seg.id()) {
                return Err(MemError::Corrupted("duplicate segment id"));
            }
            if seg.requested_size() == 0 {
                return Err(MemError::Corrupted("segment with zero size"));
            }
            if seg.page_count() != layout::pages_needed(seg.requested_size(), self.config.page_size) {
                return Err(MemError::Corrupted("segment page count mismatch"));
            }
            if seg.pages().windows(2).any(|w| w[0] >= w[1]) {
                return Err(MemError::Corrupted("segment pages not ascending"));
            }
            for &index in seg.pages() {
                match self.pages.get(index).and_then(Page::owner) {
                    Some(owner) if owner == seg.id() => {}
                    _ => return Err(MemError::Corrupted("segment lists a page it does not own")),
                }
            }
            listed += seg.page_count();
        }

        let allocated = self.pages.len() - self.free_pages();
        if allocated != listed {
            return Err(MemError::Corrupted("allocated pages missing from registry"));
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn forget_segments(&mut self) {
        self.segments.clear();
    }
}
