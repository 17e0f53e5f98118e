//! procscope: process and memory introspection for Linux and macOS
//!
//! Every operation takes a [`Platform`] describing how to reach the OS: the
//! procfs pseudo-filesystem on Linux, external diagnostic tools on macOS.
//! The free functions at the crate root probe the running OS with default
//! settings; use [`Platform::from_config`] to apply a configuration file.

pub mod config;
pub mod core;
pub mod memory;
pub mod platform;
pub mod process;

// Re-export main types from core module
pub use core::types::{
    Address, Capability, InspectError, InspectResult, MemoryRange, MemorySnapshot, ModuleInfo,
    ProcessId, ProcessInfo, SkipReason, Skipped, ThreadId, ThreadInfo,
};
pub use memory::{ExecutablePolicy, MemoryRegion, Permissions, RegionBacking};
pub use platform::{Platform, Strategy};
pub use process::{ProcessEntry, ProcessEnumerator};

/// Enumerates live processes on the running OS
pub fn list_processes() -> InspectResult<ProcessEnumerator> {
    process::list_processes(&Platform::detect())
}

/// Lists the threads of `pid` on the running OS
pub fn list_threads(pid: ProcessId) -> InspectResult<Vec<ThreadInfo>> {
    process::list_threads(&Platform::detect(), pid)
}

/// Lists the modules of `pid` on the running OS
pub fn list_modules(pid: ProcessId) -> InspectResult<Capability<Vec<ModuleInfo>>> {
    process::list_modules(&Platform::detect(), pid)
}

/// Lists the executable regions of `pid` on the running OS
pub fn list_executable_regions(pid: ProcessId) -> InspectResult<Capability<Vec<MemoryRegion>>> {
    memory::list_executable_regions(&Platform::detect(), pid)
}

/// Reads `[start, end)` from `pid` on the running OS
pub fn read_memory(pid: ProcessId, start: Address, end: Address) -> InspectResult<MemorySnapshot> {
    memory::read_memory(&Platform::detect(), pid, start, end)
}
