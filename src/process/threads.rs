//! Thread listing for a single process

use crate::core::types::{InspectError, InspectResult, ProcessId, ThreadInfo};
use crate::platform::{Platform, ProcFs, Strategy};
use std::fs;
use tracing::debug;

/// Lists the threads currently owned by `pid`
///
/// Fails with `NoSuchProcess` or `AccessDenied`; any other failure surfaces
/// as an I/O error carrying the underlying message.
pub fn list_threads(platform: &Platform, pid: ProcessId) -> InspectResult<Vec<ThreadInfo>> {
    match platform.strategy() {
        Strategy::ProcFs => procfs_threads(platform.procfs(), pid),
        Strategy::ExternalTool => {
            super::probe::ensure_alive(pid)?;
            task_threads(pid)
        }
        Strategy::Unsupported => {
            super::probe::ensure_alive(pid)?;
            Err(InspectError::PlatformRestricted(format!(
                "thread listing is not implemented for {}",
                std::env::consts::OS
            )))
        }
    }
}

fn procfs_threads(procfs: &ProcFs, pid: ProcessId) -> InspectResult<Vec<ThreadInfo>> {
    if pid == 0 {
        return Err(InspectError::NoSuchProcess(pid));
    }

    let entries = fs::read_dir(procfs.task_dir(pid)).map_err(|e| InspectError::from_io(pid, e))?;

    let mut threads = Vec::new();
    for entry in entries {
        // A thread exiting mid-listing just drops out of the result.
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(pid, error = %err, "skipping task entry");
                continue;
            }
        };
        if let Some(tid) = entry.file_name().to_str().and_then(|name| name.parse().ok()) {
            threads.push(ThreadInfo::new(tid));
        }
    }

    threads.sort();
    Ok(threads)
}

#[cfg(target_os = "macos")]
fn task_threads(pid: ProcessId) -> InspectResult<Vec<ThreadInfo>> {
    use libproc::proc_pid::{listpidinfo, pidinfo, ListThreads};
    use libproc::task_info::TaskAllInfo;

    let raw = pid as i32;
    let info = pidinfo::<TaskAllInfo>(raw, 0).map_err(|reason| InspectError::access_denied(pid, reason))?;
    let count = usize::try_from(info.ptinfo.pti_threadnum).unwrap_or(0);
    let ids = listpidinfo::<ListThreads>(raw, count)
        .map_err(|reason| InspectError::access_denied(pid, reason))?;

    let mut threads: Vec<ThreadInfo> = ids.into_iter().map(ThreadInfo::new).collect();
    threads.sort();
    Ok(threads)
}

#[cfg(not(target_os = "macos"))]
fn task_threads(_pid: ProcessId) -> InspectResult<Vec<ThreadInfo>> {
    Err(InspectError::PlatformRestricted(
        "thread listing through external tools is only available on macOS".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fake_tasks(pid: &str, tids: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let task = dir.path().join(pid).join("task");
        fs::create_dir_all(&task).unwrap();
        for tid in tids {
            fs::create_dir(task.join(tid)).unwrap();
        }
        dir
    }

    #[test]
    fn test_lists_task_entries_sorted() {
        let dir = fake_tasks("300", &["305", "300", "301"]);
        let platform = Platform::new(Strategy::ProcFs).with_procfs_root(dir.path());

        let threads = list_threads(&platform, 300).unwrap();
        let tids: Vec<_> = threads.iter().map(|t| t.tid).collect();
        assert_eq!(tids, vec![300, 301, 305]);
    }

    #[test]
    fn test_missing_pid_is_no_such_process() {
        let dir = fake_tasks("300", &["300"]);
        let platform = Platform::new(Strategy::ProcFs).with_procfs_root(dir.path());

        let err = list_threads(&platform, 301).unwrap_err();
        assert!(err.is_no_such_process());
        assert!(list_threads(&platform, 0).unwrap_err().is_no_such_process());
    }

    #[cfg(unix)]
    #[test]
    fn test_unsupported_strategy_is_platform_restricted() {
        let platform = Platform::new(Strategy::Unsupported);

        let err = list_threads(&platform, std::process::id()).unwrap_err();
        assert!(matches!(err, InspectError::PlatformRestricted(_)));

        assert!(list_threads(&platform, 0x7fff_fff0).unwrap_err().is_no_such_process());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_current_process_has_threads() {
        let platform = Platform::new(Strategy::ProcFs);
        let threads = list_threads(&platform, std::process::id()).unwrap();
        assert!(!threads.is_empty());
        assert!(threads.iter().any(|t| t.tid == u64::from(std::process::id())));
    }
}
