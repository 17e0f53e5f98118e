//! Platform capability probe
//!
//! Decides which facility set the current OS offers for introspection and
//! bundles everything an inspection call needs into a [`Platform`] value that
//! is passed explicitly to every component. Nothing below this layer looks at
//! the OS name again.

pub mod procfs;
pub mod tool;

pub use procfs::ProcFs;
pub use tool::{ToolCommand, ToolOutput};

use crate::config::Config;
use crate::memory::regions::ExecutablePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Introspection path chosen for the running OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Kernel pseudo-filesystem (`/proc`)
    ProcFs,
    /// External diagnostic utilities (`vmmap`, `ps`)
    ExternalTool,
    /// Neither interface is implemented for this OS
    Unsupported,
}

impl Strategy {
    /// Classifies an OS identity as reported by `std::env::consts::OS`
    pub fn for_os(os: &str) -> Self {
        match os {
            "linux" | "android" => Strategy::ProcFs,
            "macos" => Strategy::ExternalTool,
            _ => Strategy::Unsupported,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::ProcFs => "procfs",
            Strategy::ExternalTool => "external-tool",
            Strategy::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Selects the strategy for the OS this binary is running on
pub fn select_strategy() -> Strategy {
    Strategy::for_os(std::env::consts::OS)
}

/// Everything an inspection call needs to reach the OS
#[derive(Debug, Clone)]
pub struct Platform {
    strategy: Strategy,
    procfs: ProcFs,
    vmmap: ToolCommand,
    ps: ToolCommand,
    max_read_size: u64,
    executable_policy: ExecutablePolicy,
}

impl Platform {
    /// Default ceiling for a single memory read (16 MiB)
    pub const DEFAULT_MAX_READ_SIZE: u64 = 16 * 1024 * 1024;

    /// Creates a platform for an explicit strategy with default settings
    pub fn new(strategy: Strategy) -> Self {
        Platform {
            strategy,
            procfs: ProcFs::default(),
            vmmap: ToolCommand::new("vmmap").with_timeout(Some(Duration::from_secs(30))),
            ps: ToolCommand::new("ps").with_args(["-axo", "pid=,comm="]),
            max_read_size: Self::DEFAULT_MAX_READ_SIZE,
            executable_policy: ExecutablePolicy::default(),
        }
    }

    /// Probes the running OS and uses default settings
    pub fn detect() -> Self {
        Platform::new(select_strategy())
    }

    /// Probes the running OS and applies a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.tool.timeout_secs);
        Platform::new(select_strategy())
            .with_procfs_root(&config.procfs.root)
            .with_vmmap(
                ToolCommand::new(&config.tool.vmmap_path)
                    .with_args(config.tool.args.iter().cloned())
                    .with_timeout(Some(timeout)),
            )
            .with_max_read_size(config.memory.max_read_size)
            .with_executable_policy(config.regions.executable_policy)
    }

    pub fn with_procfs_root(mut self, root: impl Into<std::path::PathBuf>) -> Self {
        self.procfs = ProcFs::new(root);
        self
    }

    pub fn with_vmmap(mut self, tool: ToolCommand) -> Self {
        self.vmmap = tool;
        self
    }

    pub fn with_ps(mut self, tool: ToolCommand) -> Self {
        self.ps = tool;
        self
    }

    pub fn with_max_read_size(mut self, limit: u64) -> Self {
        self.max_read_size = limit;
        self
    }

    pub fn with_executable_policy(mut self, policy: ExecutablePolicy) -> Self {
        self.executable_policy = policy;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn procfs(&self) -> &ProcFs {
        &self.procfs
    }

    pub fn vmmap(&self) -> &ToolCommand {
        &self.vmmap
    }

    pub fn ps(&self) -> &ToolCommand {
        &self.ps
    }

    pub fn max_read_size(&self) -> u64 {
        self.max_read_size
    }

    pub fn executable_policy(&self) -> ExecutablePolicy {
        self.executable_policy
    }
}
