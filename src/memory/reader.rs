//! Raw memory reading through the per-process memory pseudo-file

use crate::core::types::{
    Address, InspectError, InspectResult, MemoryRange, MemorySnapshot, ProcessId,
};
use crate::platform::{Platform, ProcFs, Strategy};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use tracing::{debug, trace};

const CHUNK_SIZE: usize = 64 * 1024;

/// Reads `[start, end)` of `pid`'s address space
///
/// The range is validated before anything else. The memory file is opened
/// even for a zero-length range, so a dead pid fails with `NoSuchProcess`
/// there too; the empty range then yields an empty snapshot. A range that runs into an
/// unmapped gap fails with `PartialRead`; truncated buffers are never returned.
pub fn read_memory(
    platform: &Platform,
    pid: ProcessId,
    start: Address,
    end: Address,
) -> InspectResult<MemorySnapshot> {
    let range = MemoryRange::new(start, end)?;

    match platform.strategy() {
        Strategy::ProcFs => {}
        Strategy::ExternalTool => {
            return Err(InspectError::PlatformRestricted(
                "direct memory reads are blocked on macOS by task_for_pid restrictions; \
                 attach a debugger with the required entitlements instead"
                    .to_string(),
            ))
        }
        Strategy::Unsupported => {
            return Err(InspectError::PlatformRestricted(format!(
                "memory reading is not implemented for {}",
                std::env::consts::OS
            )))
        }
    }

    let limit = platform.max_read_size();
    if range.len() > limit {
        return Err(InspectError::ReadTooLarge {
            requested: range.len(),
            limit,
        });
    }

    let mut reader = ProcFsReader::open(platform.procfs(), pid)?;
    if range.is_empty() {
        return Ok(MemorySnapshot::empty(range));
    }
    reader.read(range)
}

/// An open handle on `/proc/<pid>/mem`
///
/// The handle is closed when the reader is dropped, on every exit path.
pub struct ProcFsReader<R = File> {
    pid: ProcessId,
    source: R,
}

impl ProcFsReader<File> {
    /// Opens the memory file of `pid`
    pub fn open(procfs: &ProcFs, pid: ProcessId) -> InspectResult<Self> {
        if pid == 0 {
            return Err(InspectError::NoSuchProcess(pid));
        }
        let file = File::open(procfs.mem(pid)).map_err(|e| InspectError::from_io(pid, e))?;
        Ok(ProcFsReader::from_source(pid, file))
    }
}

impl<R: Read + Seek> ProcFsReader<R> {
    /// Wraps any seekable byte source addressed like process memory
    pub fn from_source(pid: ProcessId, source: R) -> Self {
        ProcFsReader { pid, source }
    }

    /// Reads exactly `range.len()` bytes starting at `range.start()`
    pub fn read(&mut self, range: MemoryRange) -> InspectResult<MemorySnapshot> {
        let requested = range.len();
        let wanted = usize::try_from(requested).map_err(|_| InspectError::ReadTooLarge {
            requested,
            limit: usize::MAX as u64,
        })?;

        self.source
            .seek(SeekFrom::Start(range.start().as_u64()))
            .map_err(|e| InspectError::from_io(self.pid, e))?;

        let mut bytes = Vec::with_capacity(wanted);
        let mut chunk = vec![0u8; wanted.min(CHUNK_SIZE)];
        while bytes.len() < wanted {
            let want = (wanted - bytes.len()).min(chunk.len());
            match self.source.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(n) => bytes.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) if is_unmapped(&err) => {
                    trace!(pid = self.pid, offset = bytes.len(), error = %err, "read hit unmapped memory");
                    break;
                }
                Err(err) => return Err(InspectError::from_io(self.pid, err)),
            }
        }

        debug!(
            pid = self.pid,
            start = %range.start(),
            requested,
            read = bytes.len(),
            "memory read finished"
        );

        let read = bytes.len() as u64;
        MemorySnapshot::new(range, bytes).ok_or(InspectError::PartialRead {
            start: range.start(),
            requested,
            read,
        })
    }
}

/// `EIO` and `EFAULT` are how the kernel reports a page that is not mapped
fn is_unmapped(err: &io::Error) -> bool {
    #[cfg(unix)]
    {
        matches!(err.raw_os_error(), Some(libc::EIO) | Some(libc::EFAULT))
    }
    #[cfg(not(unix))]
    {
        let _ = err;
        false
    }
}
