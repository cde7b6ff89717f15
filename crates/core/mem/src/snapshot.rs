//! Read-only views for presentation layers

use alloc::string::String;
use alloc::vec::Vec;

use crate::page::SegmentId;
use crate::pmm::{MemoryStats, PageUsage, PagedMemory};

/// One page as seen from outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub index: usize,
    pub allocated: bool,
    pub owner: Option<String>,
    /// Owning segment; tells same-named segments apart
    pub segment: Option<SegmentId>,
}

/// One segment as seen from outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentView {
    pub id: SegmentId,
    pub name: String,
    /// Requested bytes
    pub size: usize,
    pub page_count: usize,
    pub pages: Vec<usize>,
}

/// Owned copy of the allocator state, taken after a mutating call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub pages: Vec<PageView>,
    pub segments: Vec<SegmentView>,
    pub stats: MemoryStats,
    pub usage: PageUsage,
    pub internal_fragmentation: usize,
    pub external_fragmentation: usize,
}

impl PagedMemory {
    pub fn snapshot(&self) -> Snapshot {
        let pages = (0..self.total_pages())
            .map(|index| {
                let owner = self.owner_name(index).map(String::from);
                PageView {
                    index,
                    allocated: owner.is_some(),
                    owner,
                    segment: self.page(index).and_then(|page| page.owner()),
                }
            })
            .collect();

        let segments = self
            .segments()
            .iter()
            .map(|seg| SegmentView {
                id: seg.id(),
                name: seg.name().into(),
                size: seg.requested_size(),
                page_count: seg.page_count(),
                pages: seg.pages().to_vec(),
            })
            .collect();

        Snapshot {
            pages,
            segments,
            stats: self.stats(),
            usage: self.usage(),
            internal_fragmentation: self.internal_fragmentation(),
            external_fragmentation: self.external_fragmentation(),
        }
    }
}
