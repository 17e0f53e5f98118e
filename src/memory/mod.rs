//! Memory inspection: region classification and raw reads
//!
//! This module provides:
//! - Region listing from the procfs mapping table or a vmmap report
//! - Executable-region filtering under a configurable policy
//! - Bounds-checked raw reads that never return truncated buffers

pub mod reader;
pub mod regions;

pub use reader::{read_memory, ProcFsReader};
pub use regions::{
    list_executable_regions, list_regions, ExecutablePolicy, FilterCriteria, MemoryRegion,
    Permissions, RegionBacking, RegionFilter, Sharing,
};
