//! Process, thread and module records

use super::{ProcessId, ThreadId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A process seen during enumeration
///
/// Only valid for the call that produced it: the process may exit, and its pid
/// be reused, at any moment afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: ProcessId,
    pub name: Option<String>,
}

impl ProcessInfo {
    /// Creates a new ProcessInfo
    pub fn new(pid: ProcessId, name: Option<String>) -> Self {
        ProcessInfo { pid, name }
    }

    /// Case-insensitive substring match against the process name
    pub fn name_matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name
            .as_deref()
            .is_some_and(|name| name.to_lowercase().contains(&needle))
    }
}

/// A thread owned by an inspected process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ThreadInfo {
    pub tid: ThreadId,
}

impl ThreadInfo {
    pub fn new(tid: ThreadId) -> Self {
        ThreadInfo { tid }
    }
}

/// A shared object mapped into a process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub path: PathBuf,
}

impl ModuleInfo {
    /// Creates a new ModuleInfo
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ModuleInfo { path: path.into() }
    }

    /// The final path component, e.g. `libc.so.6`
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Why a candidate process was left out of an enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The process exited between being listed and being read
    Vanished,
    /// The caller may not read this process's metadata
    AccessDenied,
    /// Any other per-item failure
    Io(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Vanished => write!(f, "process exited"),
            SkipReason::AccessDenied => write!(f, "access denied"),
            SkipReason::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

/// A candidate process that could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    pub pid: ProcessId,
    pub reason: SkipReason,
}

impl Skipped {
    pub fn new(pid: ProcessId, reason: SkipReason) -> Self {
        Skipped { pid, reason }
    }
}
