//! Invocation of external diagnostic utilities

use crate::core::types::{InspectError, InspectResult};
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Captured output of a successful tool run
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// An external program plus the fixed arguments placed before per-call ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    /// Creates a command resolved through `PATH` unless `program` contains a separator
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ToolCommand {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Sets the leading arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Kills the tool if it runs longer than `timeout`; `None` waits forever
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Short name used in diagnostics, e.g. `vmmap`
    pub fn name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Runs the tool with `extra` appended to the fixed arguments
    ///
    /// A missing binary is reported as [`InspectError::ToolNotInstalled`], a
    /// non-zero exit as [`InspectError::ToolFailed`] carrying stderr, and an
    /// overrun as [`InspectError::ToolTimedOut`]. The child is always reaped.
    pub fn run<I, S>(&self, extra: I) -> InspectResult<ToolOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let name = self.name();
        let extra: Vec<OsString> = extra.into_iter().map(Into::into).collect();
        debug!(tool = %self.program.display(), args = ?self.args, extra = ?extra, "running external tool");

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .args(&extra)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group, so a timeout can take down anything the tool forked.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        let spawned = command.spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(InspectError::tool_not_installed(name));
            }
            Err(err) => return Err(InspectError::Io(err)),
        };

        // Drain both pipes off-thread so a chatty tool cannot fill a pipe
        // buffer and stall before exiting.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let status = match self.wait(&mut child) {
            Ok(Some(status)) => status,
            Ok(None) => {
                warn!(tool = %name, "external tool timed out, killing it");
                abandon(&mut child, stdout, stderr);
                return Err(InspectError::ToolTimedOut {
                    tool: name,
                    timeout: self.timeout.unwrap_or_default(),
                });
            }
            Err(err) => {
                abandon(&mut child, stdout, stderr);
                return Err(InspectError::Io(err));
            }
        };

        let output = ToolOutput {
            stdout: join_reader(stdout)?,
            stderr: join_reader(stderr)?,
        };

        if !status.success() {
            return Err(InspectError::tool_failed(
                name,
                status.to_string(),
                output.stderr.trim(),
            ));
        }

        Ok(output)
    }

    /// Waits for exit; `Ok(None)` means the deadline passed first
    fn wait(&self, child: &mut Child) -> io::Result<Option<ExitStatus>> {
        let Some(timeout) = self.timeout else {
            return child.wait().map(Some);
        };

        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

type Reader = thread::JoinHandle<io::Result<String>>;

/// Kills the tool's process group, reaps the tool and joins both pipe readers
///
/// Every process holding a pipe end is in the group, so the readers see EOF
/// and the join cannot hang.
fn abandon(child: &mut Child, stdout: Option<Reader>, stderr: Option<Reader>) {
    #[cfg(unix)]
    if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: signalling a process group we created has no memory effects.
        unsafe {
            libc::kill(-pgid, libc::SIGKILL);
        }
    }
    let _ = child.kill();
    let _ = child.wait();
    for reader in [stdout, stderr].into_iter().flatten() {
        let _ = reader.join();
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Reader {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    })
}

fn join_reader(handle: Option<Reader>) -> InspectResult<String> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| InspectError::Io(io::Error::new(io::ErrorKind::Other, "pipe reader panicked")))?
            .map_err(InspectError::Io),
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(ToolCommand::new("vmmap").name(), "vmmap");
        assert_eq!(ToolCommand::new("/usr/bin/vmmap").name(), "vmmap");
    }

    #[test]
    fn test_missing_tool() {
        let tool = ToolCommand::new("/nonexistent/procscope-test/vmmap");
        let err = tool.run(["1"]).unwrap_err();
        assert!(matches!(err, InspectError::ToolNotInstalled { ref tool } if tool == "vmmap"));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_and_appends_args() {
        let tool = ToolCommand::new("sh").with_args(["-c", "echo \"target=$1\"", "sh"]);
        let output = tool.run(["4242"]).unwrap();
        assert_eq!(output.stdout.trim(), "target=4242");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_carries_stderr() {
        let tool = ToolCommand::new("sh").with_args(["-c", "echo 'cannot examine' >&2; exit 3", "sh"]);
        match tool.run(["1"]).unwrap_err() {
            InspectError::ToolFailed {
                tool, diagnostic, ..
            } => {
                assert_eq!(tool, "sh");
                assert_eq!(diagnostic, "cannot examine");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_tool() {
        let tool = ToolCommand::new("sh")
            .with_args(["-c", "exec sleep 10", "sh"])
            .with_timeout(Some(Duration::from_millis(200)));
        let started = Instant::now();
        let err = tool.run(["1"]).unwrap_err();
        assert!(matches!(err, InspectError::ToolTimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_also_kills_forked_children() {
        // The background sleep inherits stdout and stderr; the call must
        // still return once the deadline passes.
        let tool = ToolCommand::new("sh")
            .with_args(["-c", "sleep 10 & sleep 10", "sh"])
            .with_timeout(Some(Duration::from_millis(200)));
        let started = Instant::now();
        let err = tool.run(["1"]).unwrap_err();
        assert!(matches!(err, InspectError::ToolTimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_large_output_does_not_stall() {
        let tool = ToolCommand::new("sh")
            .with_args(["-c", "i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done", "sh"])
            .with_timeout(Some(Duration::from_secs(30)));
        let output = tool.run(["1"]).unwrap();
        assert_eq!(output.stdout.lines().count(), 20000);
    }
}
