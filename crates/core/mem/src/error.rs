//! Memory error types

use alloc::string::String;
use thiserror::Error;

/// Memory Result type
pub type MemResult<T> = Result<T, MemError>;

/// Memory error types
///
/// Every variant is recoverable: the allocator reports it and keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemError {
    /// Empty segment name or zero-byte request
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
    /// Not enough free pages for the request
    #[error("insufficient memory: {needed} pages needed, {free} free")]
    InsufficientMemory { needed: usize, free: usize },
    /// Address beyond the last page
    #[error("address {addr:#x} out of range (limit {limit:#x})")]
    AddressOutOfRange { addr: usize, limit: usize },
    /// Access to an unallocated page
    #[error("page fault at page {page}")]
    PageFault { page: usize },
    /// Segment name already live (unique-name policy only)
    #[error("segment name already in use: {0}")]
    NameConflict(String),
    /// Zero or oversized geometry
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Page table and segment registry disagree
    #[error("memory state corrupted: {0}")]
    Corrupted(&'static str),
}

impl MemError {
    /// Faults are counted in the statistics; other errors are not
    pub fn is_fault(&self) -> bool {
        matches!(self, MemError::InsufficientMemory { .. } | MemError::PageFault { .. })
    }
}
