//! Core type definitions for procscope
//!
//! Every value here is a read-only, point-in-time view of OS state built fresh
//! for a single call.

mod address;
mod capability;
mod error;
mod process_info;
mod range;

// Re-export all public types
pub use address::Address;
pub use capability::Capability;
pub use error::{InspectError, InspectResult};
pub use process_info::{ModuleInfo, ProcessInfo, SkipReason, Skipped, ThreadInfo};
pub use range::{MemoryRange, MemorySnapshot};

// Common type aliases
pub type ProcessId = u32;
pub type ThreadId = u64;
