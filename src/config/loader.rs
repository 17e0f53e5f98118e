//! Configuration loader for procscope
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use crate::memory::regions::ExecutablePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "procscope.toml";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_procfs")]
    pub procfs: ProcFsConfig,

    #[serde(default = "default_tool")]
    pub tool: ToolConfig,

    #[serde(default = "default_memory")]
    pub memory: MemoryConfig,

    #[serde(default = "default_regions")]
    pub regions: RegionConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Where the kernel pseudo-filesystem is mounted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcFsConfig {
    #[serde(default = "default_procfs_root")]
    pub root: PathBuf,
}

/// External diagnostic tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default = "default_vmmap_path")]
    pub vmmap_path: String,
    /// Arguments placed before the pid
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_max_read_size")]
    pub max_read_size: u64,
    /// Bytes per row in the text dump
    #[serde(default = "default_row_width")]
    pub row_width: usize,
}

/// Region classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_executable_policy")]
    pub executable_policy: ExecutablePolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        debug!(path = %self.config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads configuration, falling back to defaults only when the file is absent
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Loads configuration
///
/// An explicit `path` must exist. Without one, `procscope.toml` in the working
/// directory is used when present and defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => ConfigLoader::new(path).load(),
        None => ConfigLoader::new(DEFAULT_CONFIG_FILE).load_or_default(),
    }
}

// Default functions for serde
fn default_procfs() -> ProcFsConfig {
    ProcFsConfig {
        root: default_config().procfs.root,
    }
}

fn default_tool() -> ToolConfig {
    let defaults = default_config();
    ToolConfig {
        vmmap_path: defaults.tool.vmmap_path,
        args: defaults.tool.args,
        timeout_secs: defaults.tool.timeout_secs,
    }
}

fn default_memory() -> MemoryConfig {
    let defaults = default_config();
    MemoryConfig {
        max_read_size: defaults.memory.max_read_size,
        row_width: defaults.memory.row_width,
    }
}

fn default_regions() -> RegionConfig {
    RegionConfig {
        executable_policy: default_config().regions.executable_policy,
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_config().logging.level,
    }
}

// Individual field defaults
fn default_procfs_root() -> PathBuf {
    default_config().procfs.root
}

fn default_vmmap_path() -> String {
    default_config().tool.vmmap_path
}

fn default_timeout_secs() -> u64 {
    default_config().tool.timeout_secs
}

fn default_max_read_size() -> u64 {
    default_config().memory.max_read_size
}

fn default_row_width() -> usize {
    default_config().memory.row_width
}

fn default_executable_policy() -> ExecutablePolicy {
    default_config().regions.executable_policy
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            procfs: default_procfs(),
            tool: default_tool(),
            memory: default_memory(),
            regions: default_regions(),
            logging: default_logging(),
        }
    }
}
