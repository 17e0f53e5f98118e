//! Configuration validator for procscope
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, LoggingConfig, MemoryConfig, ProcFsConfig, ToolConfig};

/// Upper bound on a single read, whatever the config says
pub const MAX_READ_CEILING: u64 = 1024 * 1024 * 1024;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_procfs(&config.procfs)?;
        Self::validate_tool(&config.tool)?;
        Self::validate_memory(&config.memory)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    fn validate_procfs(procfs: &ProcFsConfig) -> Result<(), ConfigError> {
        if procfs.root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "procfs root cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_tool(tool: &ToolConfig) -> Result<(), ConfigError> {
        if tool.vmmap_path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "vmmap path cannot be empty".to_string(),
            ));
        }

        if tool.timeout_secs == 0 || tool.timeout_secs > 3600 {
            return Err(ConfigError::Invalid(format!(
                "Tool timeout must be between 1 and 3600 seconds, got {}",
                tool.timeout_secs
            )));
        }

        Ok(())
    }

    /// Validates memory configuration
    fn validate_memory(memory: &MemoryConfig) -> Result<(), ConfigError> {
        if memory.max_read_size == 0 {
            return Err(ConfigError::Invalid(
                "Maximum read size must be greater than 0".to_string(),
            ));
        }

        if memory.max_read_size > MAX_READ_CEILING {
            return Err(ConfigError::Invalid(
                "Maximum read size cannot exceed 1GB".to_string(),
            ));
        }

        if memory.row_width == 0 || memory.row_width > 64 {
            return Err(ConfigError::Invalid(format!(
                "Row width must be between 1 and 64, got {}",
                memory.row_width
            )));
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }
        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_procfs_root() {
        let mut config = Config::default();
        config.procfs.root = PathBuf::new();
        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("procfs root"));
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = Config::default();
        config.tool.timeout_secs = 0;
        assert!(validate_config(&config).is_err());

        config.tool.timeout_secs = 3601;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_read_size() {
        let mut config = Config::default();
        config.memory.max_read_size = 0;
        assert!(validate_config(&config).is_err());

        config.memory.max_read_size = MAX_READ_CEILING + 1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_row_width() {
        let mut config = Config::default();
        config.memory.row_width = 0;
        assert!(validate_config(&config).is_err());

        config.memory.row_width = 65;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("log level"));
    }

    #[test]
    fn test_edge_cases() {
        let mut config = Config::default();

        config.tool.timeout_secs = 1;
        config.memory.max_read_size = 1;
        config.memory.row_width = 1;
        config.logging.level = "TRACE".to_string();
        assert!(validate_config(&config).is_ok());

        config.tool.timeout_secs = 3600;
        config.memory.max_read_size = MAX_READ_CEILING;
        config.memory.row_width = 64;
        assert!(validate_config(&config).is_ok());
    }
}
