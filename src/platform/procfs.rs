//! Paths into the kernel's per-process pseudo-filesystem

use crate::core::types::ProcessId;
use std::path::{Path, PathBuf};

/// Root of a procfs mount
///
/// Defaults to `/proc`; any directory laid out the same way works, which is
/// how fixture trees are inspected in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    pub const DEFAULT_ROOT: &'static str = "/proc";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        ProcFs { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<pid>`
    pub fn pid_dir(&self, pid: ProcessId) -> PathBuf {
        self.root.join(pid.to_string())
    }

    /// `<root>/<pid>/comm`, the short process name
    pub fn comm(&self, pid: ProcessId) -> PathBuf {
        self.pid_dir(pid).join("comm")
    }

    /// `<root>/<pid>/task`, one entry per thread
    pub fn task_dir(&self, pid: ProcessId) -> PathBuf {
        self.pid_dir(pid).join("task")
    }

    /// `<root>/<pid>/maps`, the mapping table
    pub fn maps(&self, pid: ProcessId) -> PathBuf {
        self.pid_dir(pid).join("maps")
    }

    /// `<root>/<pid>/mem`, the raw address space
    pub fn mem(&self, pid: ProcessId) -> PathBuf {
        self.pid_dir(pid).join("mem")
    }

    /// Checks whether a pid currently has an entry
    pub fn has_process(&self, pid: ProcessId) -> bool {
        pid != 0 && self.pid_dir(pid).is_dir()
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        ProcFs::new(Self::DEFAULT_ROOT)
    }
}

/// Parses a procfs directory entry name as a pid
pub fn parse_pid(name: &str) -> Option<ProcessId> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok().filter(|&pid: &ProcessId| pid != 0)
}
