//! Text rendering of allocator snapshots
//!
//! Pure presentation: everything here reads a [`Snapshot`] and writes text.

use pagesim_mem::{layout, FragmentationReport, PageHit, SegmentId, Snapshot};
use std::collections::HashMap;
use std::io::{self, Write};

/// Marker for a free page in the memory map
const FREE_MARK: char = '.';

/// Map keys handed out to segments in registry order, wrapping around
const KEYS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn key(slot: usize) -> char {
    KEYS[slot % KEYS.len()] as char
}

/// Segment id -> map key
fn keys(snap: &Snapshot) -> HashMap<SegmentId, char> {
    snap.segments
        .iter()
        .enumerate()
        .map(|(slot, seg)| (seg.id, key(slot)))
        .collect()
}

/// One character per page: the owning segment's key, `.` when free
///
/// Keys follow the segment table, so segments that share a name or a first
/// letter still get different characters.
pub fn memory_map(snap: &Snapshot) -> String {
    let keys = keys(snap);
    snap.pages
        .iter()
        .map(|page| {
            page.segment
                .and_then(|id| keys.get(&id).copied())
                .unwrap_or(FREE_MARK)
        })
        .collect()
}

pub fn pages<W: Write>(out: &mut W, snap: &Snapshot) -> io::Result<()> {
    let page_size = snap.usage.page_size;
    writeln!(
        out,
        "Pages ({} x {} bytes)  [{}]",
        snap.usage.total_pages,
        page_size,
        memory_map(snap)
    )?;
    writeln!(out, "  {:>5}  {:>8}  {:<5}  {}", "page", "address", "state", "owner")?;
    for page in &snap.pages {
        let state = if page.allocated { "used" } else { "free" };
        writeln!(
            out,
            "  {:>5}  {:>#8x}  {:<5}  {}",
            page.index,
            layout::addr_of(page.index, page_size),
            state,
            page.owner.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}

pub fn segments<W: Write>(out: &mut W, snap: &Snapshot) -> io::Result<()> {
    if snap.segments.is_empty() {
        return writeln!(out, "Segments: none");
    }
    writeln!(out, "Segments")?;
    writeln!(
        out,
        "  {:<3}  {:<12}  {:>8}  {:>5}  {}",
        "key", "name", "size", "pages", "frames"
    )?;
    for (slot, seg) in snap.segments.iter().enumerate() {
        let frames: Vec<String> = seg.pages.iter().map(usize::to_string).collect();
        writeln!(
            out,
            "  {:<3}  {:<12}  {:>8}  {:>5}  {}",
            key(slot),
            seg.name,
            seg.size,
            seg.page_count,
            frames.join(",")
        )?;
    }
    Ok(())
}

pub fn stats<W: Write>(out: &mut W, snap: &Snapshot, frag: &FragmentationReport) -> io::Result<()> {
    let usage = &snap.usage;
    writeln!(
        out,
        "Stats: allocations {}  deallocations {}  page faults {}",
        snap.stats.allocations, snap.stats.deallocations, snap.stats.page_faults
    )?;
    writeln!(
        out,
        "Usage: {}/{} pages ({}%), {} of {} bytes free",
        usage.used_pages,
        usage.total_pages,
        usage.usage_percent(),
        usage.free_bytes,
        usage.total_bytes
    )?;
    let largest = frag.largest_free_run.map_or(0, |run| run.len);
    writeln!(
        out,
        "Fragmentation: internal {} B  external {} B  free runs {} (largest {} pages)  ratio {:.2}",
        snap.internal_fragmentation,
        snap.external_fragmentation,
        frag.free_runs,
        largest,
        frag.ratio
    )
}

/// Full view: pages, segments, stats
pub fn all<W: Write>(out: &mut W, snap: &Snapshot, frag: &FragmentationReport) -> io::Result<()> {
    pages(out, snap)?;
    segments(out, snap)?;
    stats(out, snap, frag)
}

pub fn hit<W: Write>(out: &mut W, addr: usize, hit: &PageHit) -> io::Result<()> {
    writeln!(
        out,
        "Address {:#x} -> page {} offset {} (segment {})",
        addr, hit.page, hit.offset, hit.owner
    )
}

/// Error shown to the user; never ends the session
pub fn alert<W: Write>(out: &mut W, message: impl std::fmt::Display) -> io::Result<()> {
    writeln!(out, "! {}", message)
}
