//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading an
//! [`AuditConfig`] from a YAML file. Settings not named in the file keep
//! their defaults, so a minimal file like
//!
//! ```yaml
//! earnings_tolerance: "0.05"
//! name_threshold: 0.9
//! ```
//!
//! is a complete configuration.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::AuditConfig;

/// Loads and validates an audit configuration from disk.
///
/// # Example
///
/// ```no_run
/// use payroll_auditor::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/audit.yaml")?;
/// let config = loader.config();
/// # Ok::<(), payroll_auditor::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AuditConfig,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` if the file cannot be read, `ConfigParse`
    /// if it is not valid YAML for [`AuditConfig`], and `InvalidConfig` if
    /// any loaded value is outside its allowed range.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: AuditConfig =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParse {
                path: path_str,
                message: e.to_string(),
            })?;

        config.validate()?;

        Ok(Self { config })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> AuditConfig {
        self.config
    }
}
