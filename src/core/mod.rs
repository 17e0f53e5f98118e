//! Core module containing the fundamental types of procscope
//!
//! Addresses, ranges, process/thread/module records, the capability outcome
//! and the error taxonomy shared by every inspection operation.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, Capability, InspectError, InspectResult, MemoryRange, MemorySnapshot, ModuleInfo,
    ProcessId, ProcessInfo, ThreadId, ThreadInfo,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
