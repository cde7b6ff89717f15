//! Fragmentation accounting
//!
//! Internal fragmentation is the slack inside allocated pages. External
//! fragmentation is measured over maximal runs of free pages in physical
//! order; which bytes count is set by [`ExternalPolicy`].

use crate::config::ExternalPolicy;
use crate::layout;
use crate::page::Page;
use crate::pmm::PagedMemory;

/// Maximal run of consecutive free pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeRun {
    /// First page of the run
    pub start: usize,
    /// Pages in the run
    pub len: usize,
}

impl FreeRun {
    /// One past the last page
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn bytes(&self, page_size: usize) -> usize {
        layout::bytes_of(self.len, page_size)
    }
}

/// Iterator over the free runs of a page table
#[derive(Debug, Clone)]
pub struct FreeRuns<'a> {
    pages: &'a [Page],
    pos: usize,
}

impl<'a> FreeRuns<'a> {
    pub fn new(pages: &'a [Page]) -> Self {
        Self { pages, pos: 0 }
    }
}

impl Iterator for FreeRuns<'_> {
    type Item = FreeRun;

    fn next(&mut self) -> Option<FreeRun> {
        let rest = &self.pages[self.pos..];
        let start = self.pos + rest.iter().position(|page| !page.is_allocated())?;
        let len = self.pages[start..]
            .iter()
            .take_while(|page| !page.is_allocated())
            .count();
        self.pos = start + len;
        Some(FreeRun { start, len })
    }
}

/// All fragmentation figures at once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentationReport {
    pub internal_bytes: usize,
    pub external_bytes: usize,
    /// Number of free runs
    pub free_runs: usize,
    pub largest_free_run: Option<FreeRun>,
    pub ratio: f64,
}

/// `1 - largest / total`, clamped to `[0, 1]`; zero when nothing is free
pub fn fragmentation_ratio(total_free_bytes: usize, largest_run_bytes: usize) -> f64 {
    if total_free_bytes == 0 {
        return 0.0;
    }
    let largest = largest_run_bytes.min(total_free_bytes) as f64;
    let ratio = 1.0 - largest / total_free_bytes as f64;
    ratio.clamp(0.0, 1.0)
}

impl PagedMemory {
    /// Bytes reserved by live segments beyond what they requested
    pub fn internal_fragmentation(&self) -> usize {
        let page_size = self.page_size();
        self.segments()
            .iter()
            .map(|seg| seg.wasted_bytes(page_size))
            .sum()
    }

    /// Free bytes counted as external fragmentation under the configured policy
    pub fn external_fragmentation(&self) -> usize {
        let page_size = self.page_size();
        let total: usize = self.free_runs().map(|run| run.bytes(page_size)).sum();
        match self.config().external {
            ExternalPolicy::TotalFree => total,
            ExternalPolicy::OutsideLargestRun => {
                let largest = self.largest_free_run().map_or(0, |run| run.bytes(page_size));
                total - largest
            }
        }
    }

    pub fn free_runs(&self) -> FreeRuns<'_> {
        FreeRuns::new(self.pages())
    }

    /// Longest free run; the earliest wins a tie
    pub fn largest_free_run(&self) -> Option<FreeRun> {
        self.free_runs()
            .fold(None, |best: Option<FreeRun>, run| match best {
                Some(b) if b.len >= run.len => Some(b),
                _ => Some(run),
            })
    }

    pub fn fragmentation_ratio(&self) -> f64 {
        let page_size = self.page_size();
        let free = layout::bytes_of(self.free_pages(), page_size);
        let largest = self.largest_free_run().map_or(0, |run| run.bytes(page_size));
        fragmentation_ratio(free, largest)
    }

    pub fn fragmentation(&self) -> FragmentationReport {
        FragmentationReport {
            internal_bytes: self.internal_fragmentation(),
            external_bytes: self.external_fragmentation(),
            free_runs: self.free_runs().count(),
            largest_free_run: self.largest_free_run(),
            ratio: self.fragmentation_ratio(),
        }
    }
}
