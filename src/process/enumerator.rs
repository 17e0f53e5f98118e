//! Process directory: enumeration of live processes

use crate::core::types::{
    InspectError, InspectResult, ProcessId, ProcessInfo, SkipReason, Skipped,
};
use crate::platform::procfs::parse_pid;
use crate::platform::{Platform, ProcFs, Strategy};
use std::fs::{self, ReadDir};
use std::io;
use std::vec;
use tracing::debug;

/// One element of a process enumeration
pub type ProcessEntry = Result<ProcessInfo, Skipped>;

/// Lazy, one-shot enumeration of live processes
///
/// Each candidate is resolved when it is visited. Candidates that exit or deny
/// access are yielded as [`Skipped`] instead of aborting the whole listing.
pub struct ProcessEnumerator {
    source: Source,
}

enum Source {
    ProcFs { procfs: ProcFs, entries: ReadDir },
    Listing(vec::IntoIter<ProcessEntry>),
}

impl ProcessEnumerator {
    /// Starts an enumeration on the given platform
    pub fn new(platform: &Platform) -> InspectResult<Self> {
        let source = match platform.strategy() {
            Strategy::ProcFs => {
                let procfs = platform.procfs().clone();
                let entries = fs::read_dir(procfs.root())?;
                Source::ProcFs { procfs, entries }
            }
            Strategy::ExternalTool => {
                let output = platform.ps().run(std::iter::empty::<&str>())?;
                Source::Listing(parse_ps_listing(&output.stdout).into_iter())
            }
            Strategy::Unsupported => {
                return Err(InspectError::PlatformRestricted(format!(
                    "process enumeration is not implemented for {}",
                    std::env::consts::OS
                )))
            }
        };
        Ok(ProcessEnumerator { source })
    }

    /// Drops skipped candidates, keeping only resolved processes
    pub fn resolved(self) -> impl Iterator<Item = ProcessInfo> {
        self.filter_map(Result::ok)
    }
}

impl Iterator for ProcessEnumerator {
    type Item = ProcessEntry;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            Source::ProcFs { procfs, entries } => loop {
                let entry = match entries.next()? {
                    Ok(entry) => entry,
                    Err(err) => {
                        debug!(error = %err, "failed to read procfs directory entry");
                        continue;
                    }
                };
                let Some(pid) = entry.file_name().to_str().and_then(parse_pid) else {
                    continue;
                };
                return Some(resolve_procfs(procfs, pid));
            },
            Source::Listing(rows) => rows.next(),
        }
    }
}

/// Reads the name of one procfs candidate
fn resolve_procfs(procfs: &ProcFs, pid: ProcessId) -> ProcessEntry {
    match fs::read_to_string(procfs.comm(pid)) {
        Ok(comm) => Ok(ProcessInfo::new(pid, non_empty(comm.trim_end_matches('\n')))),
        Err(err) => {
            let reason = skip_reason(&err);
            debug!(pid, reason = %reason, "skipping process");
            Err(Skipped::new(pid, reason))
        }
    }
}

fn skip_reason(err: &io::Error) -> SkipReason {
    #[cfg(unix)]
    {
        if err.raw_os_error() == Some(libc::ESRCH) {
            return SkipReason::Vanished;
        }
    }
    match err.kind() {
        io::ErrorKind::NotFound => SkipReason::Vanished,
        io::ErrorKind::PermissionDenied => SkipReason::AccessDenied,
        _ => SkipReason::Io(err.to_string()),
    }
}

fn non_empty(name: &str) -> Option<String> {
    (!name.is_empty()).then(|| name.to_string())
}

/// Parses `ps -axo pid=,comm=` output
///
/// The command column may contain spaces; everything after the pid is the name.
pub fn parse_ps_listing(text: &str) -> Vec<ProcessEntry> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let (pid, name) = match line.split_once(char::is_whitespace) {
                Some((pid, name)) => (pid, name.trim()),
                None => (line, ""),
            };
            match pid.parse::<ProcessId>() {
                Ok(pid) if pid != 0 => Some(Ok(ProcessInfo::new(pid, non_empty(name)))),
                _ => {
                    debug!(line, "skipping unparseable ps line");
                    None
                }
            }
        })
        .collect()
}

/// Enumerates every live process visible to the caller
pub fn list_processes(platform: &Platform) -> InspectResult<ProcessEnumerator> {
    ProcessEnumerator::new(platform)
}

/// Finds processes whose name contains `name` (case-insensitive)
pub fn find_processes_by_name(platform: &Platform, name: &str) -> InspectResult<Vec<ProcessInfo>> {
    Ok(list_processes(platform)?
        .resolved()
        .filter(|p| p.name_matches(name))
        .collect())
}
