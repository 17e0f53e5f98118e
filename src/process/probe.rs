//! Liveness checks for a pid without touching procfs

use crate::core::types::{InspectError, InspectResult, ProcessId};

/// Confirms that `pid` names a live process
///
/// Uses a null signal: `ESRCH` means no such process, `EPERM` means the
/// process exists but belongs to someone else (later calls will report
/// `AccessDenied` if they actually need access).
#[cfg(unix)]
pub fn ensure_alive(pid: ProcessId) -> InspectResult<()> {
    let raw = match libc::pid_t::try_from(pid) {
        Ok(raw) if raw > 0 => raw,
        _ => return Err(InspectError::NoSuchProcess(pid)),
    };

    // SAFETY: signal 0 performs only the existence and permission checks.
    let rc = unsafe { libc::kill(raw, 0) };
    if rc == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::EPERM) => Ok(()),
        Some(libc::ESRCH) => Err(InspectError::NoSuchProcess(pid)),
        _ => Err(InspectError::Io(err)),
    }
}

#[cfg(not(unix))]
pub fn ensure_alive(pid: ProcessId) -> InspectResult<()> {
    if pid == 0 {
        return Err(InspectError::NoSuchProcess(pid));
    }
    Ok(())
}
