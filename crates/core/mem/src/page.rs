//! Page table entries and segment records

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Opaque handle for one allocation
///
/// Unique among allocations made since the last `initialize`, so same-named
/// segments stay distinguishable in the page table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(u64);

impl SegmentId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One physical page
///
/// A page is allocated exactly when it has an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    owner: Option<SegmentId>,
}

impl Page {
    pub const FREE: Page = Page { owner: None };

    pub(crate) const fn owned_by(id: SegmentId) -> Self {
        Page { owner: Some(id) }
    }

    #[inline]
    pub const fn is_allocated(&self) -> bool {
        self.owner.is_some()
    }

    #[inline]
    pub const fn owner(&self) -> Option<SegmentId> {
        self.owner
    }
}

/// A named allocation spanning one or more pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    id: SegmentId,
    name: String,
    requested_size: usize,
    pages: Vec<usize>,
}

impl Segment {
    pub(crate) fn new(id: SegmentId, name: String, requested_size: usize, pages: Vec<usize>) -> Self {
        Self {
            id,
            name,
            requested_size,
            pages,
        }
    }

    pub fn id(&self) -> SegmentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes the caller asked for
    pub fn requested_size(&self) -> usize {
        self.requested_size
    }

    /// Page indices in ascending physical order
    pub fn pages(&self) -> &[usize] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Bytes reserved minus bytes requested
    pub fn wasted_bytes(&self, page_size: usize) -> usize {
        (self.pages.len() * page_size).saturating_sub(self.requested_size)
    }

    pub(crate) fn pages_mut(&mut self) -> &mut Vec<usize> {
        &mut self.pages
    }
}
