//! pagesim Memory Management
//!
//! Fixed-size paged memory simulation:
//! - `layout` - Default geometry and page arithmetic
//! - `config` - Geometry plus naming and fragmentation policies
//! - `page` - Page table entries and segment records
//! - `pmm` - The allocator: allocate, deallocate, access, compact
//! - `frag` - Internal/external fragmentation and free runs
//! - `snapshot` - Owned read-only views for presentation layers
//! - `locked` - Mutex-guarded allocator for shared use
//!
//! # Architecture
//!
//! ```text
//! layout.rs  ─── Page arithmetic (NO magic numbers elsewhere)
//!    │
//!    ├── config.rs ─── MemoryConfig (validated once, fixed for life)
//!    │
//!    ├── pmm.rs  ─── PagedMemory: page table + segment registry + stats
//!    │      │
//!    │      ├── frag.rs ─── fragmentation queries
//!    │      └── snapshot.rs ─── Snapshot for renderers
//!    │
//!    └── locked.rs ─── LockedMemory (spin::Mutex<PagedMemory>)
//! ```
//!
//! # Usage
//!
//! ```
//! use pagesim_mem::{MemError, PagedMemory};
//!
//! let mut mem = PagedMemory::default();
//! assert_eq!(mem.allocate("A", 100), Ok(vec![0, 1]));
//! assert_eq!(mem.internal_fragmentation(), 28);
//!
//! let err = mem.allocate("B", 1000).unwrap_err();
//! assert!(matches!(err, MemError::InsufficientMemory { needed: 16, free: 14 }));
//! assert_eq!(mem.stats().page_faults, 1);
//!
//! mem.deallocate("A");
//! assert_eq!(mem.external_fragmentation(), 1024);
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
mod debug;

// Core modules
pub mod layout;
pub mod config;
pub mod error;
pub mod page;
pub mod pmm;
pub mod frag;
pub mod snapshot;
pub mod locked;


// Re-export commonly used items
pub use layout::{DEFAULT_PAGE_SIZE, DEFAULT_TOTAL_MEMORY, DEFAULT_TOTAL_PAGES, MAX_PAGES};
pub use config::{ExternalPolicy, MemoryConfig, NamePolicy};
pub use error::{MemError, MemResult};
pub use page::{Page, Segment, SegmentId};
pub use pmm::{MemoryStats, PageHit, PageUsage, PagedMemory, Released};
pub use frag::{FragmentationReport, FreeRun, FreeRuns};
pub use snapshot::{PageView, SegmentView, Snapshot};
pub use locked::LockedMemory;
