//! Default configuration values for procscope

use crate::memory::regions::ExecutablePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub procfs: ProcFsDefaults,
    pub tool: ToolDefaults,
    pub memory: MemoryDefaults,
    pub regions: RegionDefaults,
    pub logging: LoggingDefaults,
}

/// Default procfs configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcFsDefaults {
    pub root: PathBuf,
}

/// Default external tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefaults {
    pub vmmap_path: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

/// Default memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryDefaults {
    pub max_read_size: u64,
    pub row_width: usize,
}

/// Default region classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDefaults {
    pub executable_policy: ExecutablePolicy,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        procfs: ProcFsDefaults {
            root: PathBuf::from("/proc"),
        },
        tool: ToolDefaults {
            vmmap_path: "vmmap".to_string(),
            args: Vec::new(),
            timeout_secs: 30,
        },
        memory: MemoryDefaults {
            max_read_size: 16 * 1024 * 1024, // 16MB
            row_width: 16,
        },
        regions: RegionDefaults {
            executable_policy: ExecutablePolicy::ReadExecute,
        },
        logging: LoggingDefaults {
            level: "warn".to_string(),
        },
    }
}
