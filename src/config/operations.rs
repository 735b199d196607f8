//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{Result, SymlockError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV_VAR: &str = "SYMLOCK_CONFIG";

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML file
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(SymlockError::UserError)` - Read error, parse error, or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            SymlockError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for a CLI invocation.
    ///
    /// An explicit path wins, then `SYMLOCK_CONFIG`, then built-in defaults.
    /// A path that was asked for but cannot be loaded is an error.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve_with(explicit, std::env::var_os(CONFIG_ENV_VAR))
    }

    pub(super) fn resolve_with(explicit: Option<&Path>, env_value: Option<OsString>) -> Result<Self> {
        let from_env = env_value.filter(|v| !v.is_empty()).map(PathBuf::from);

        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| SymlockError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `max_attempts` must be positive
    /// - `proc_root` must be non-empty
    /// - `event_log`, if set, must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(SymlockError::UserError(
                "config validation failed: max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.proc_root.as_os_str().is_empty() {
            return Err(SymlockError::UserError(
                "config validation failed: proc_root must be non-empty".to_string(),
            ));
        }

        if let Some(event_log) = &self.event_log
            && event_log.as_os_str().is_empty()
        {
            return Err(SymlockError::UserError(
                "config validation failed: event_log must be non-empty when set".to_string(),
            ));
        }

        Ok(())
    }
}
