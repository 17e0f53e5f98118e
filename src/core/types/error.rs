//! Error types for process and memory inspection

use super::{Address, ProcessId};
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Main error type for inspection operations
///
/// Capability gaps (an OS that cannot answer a question at all) are not
/// errors; they are reported through [`Capability::Unsupported`].
///
/// [`Capability::Unsupported`]: super::Capability::Unsupported
#[derive(Error, Debug)]
pub enum InspectError {
    #[error("No such process: PID {0}")]
    NoSuchProcess(ProcessId),

    #[error("Access denied to process {pid}: {reason}")]
    AccessDenied { pid: ProcessId, reason: String },

    #[error("{tool} command not found; install it (on macOS: Xcode command line tools) or point tool.vmmap_path at it")]
    ToolNotInstalled { tool: String },

    #[error("{tool} failed ({status}): {diagnostic}")]
    ToolFailed {
        tool: String,
        status: String,
        diagnostic: String,
    },

    #[error("{tool} did not finish within {}s", .timeout.as_secs())]
    ToolTimedOut { tool: String, timeout: Duration },

    #[error("Partial read at {start}: requested {requested} bytes, only {read} were mapped and readable")]
    PartialRead {
        start: Address,
        requested: u64,
        read: u64,
    },

    #[error("Operation restricted on this platform: {0}")]
    PlatformRestricted(String),

    #[error("Invalid memory range: start {start} is above end {end}")]
    InvalidRange { start: Address, end: Address },

    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Read of {requested} bytes exceeds the configured limit of {limit} bytes")]
    ReadTooLarge { requested: u64, limit: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for inspection operations
pub type InspectResult<T> = Result<T, InspectError>;

impl InspectError {
    /// Creates an access denied error for a process
    pub fn access_denied(pid: ProcessId, reason: impl Into<String>) -> Self {
        InspectError::AccessDenied {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates a tool-not-installed error
    pub fn tool_not_installed(tool: impl Into<String>) -> Self {
        InspectError::ToolNotInstalled { tool: tool.into() }
    }

    /// Creates a tool failure carrying the captured diagnostic text
    pub fn tool_failed(
        tool: impl Into<String>,
        status: impl Into<String>,
        diagnostic: impl Into<String>,
    ) -> Self {
        InspectError::ToolFailed {
            tool: tool.into(),
            status: status.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Classifies an I/O error raised while touching a per-process resource
    ///
    /// A missing `/proc/<pid>` entry or `ESRCH` means the process is gone;
    /// `EACCES`/`EPERM` mean the caller may not inspect it. Anything else is
    /// passed through unchanged.
    pub fn from_io(pid: ProcessId, err: io::Error) -> Self {
        #[cfg(unix)]
        {
            match err.raw_os_error() {
                Some(libc::ESRCH) => return InspectError::NoSuchProcess(pid),
                Some(libc::EPERM) | Some(libc::EACCES) => {
                    return InspectError::access_denied(pid, err.to_string())
                }
                _ => {}
            }
        }

        match err.kind() {
            io::ErrorKind::NotFound => InspectError::NoSuchProcess(pid),
            io::ErrorKind::PermissionDenied => InspectError::access_denied(pid, err.to_string()),
            _ => InspectError::Io(err),
        }
    }

    /// True when the error means the pid does not resolve to a live process
    pub fn is_no_such_process(&self) -> bool {
        matches!(self, InspectError::NoSuchProcess(_))
    }
}
