//! Registry configuration, loaded from TOML.
//!
//! Every key is optional:
//!
//! ```toml
//! page_size = 20
//! page_sizes = [10, 20, 50]
//! bind_addr = "0.0.0.0:3000"
//!
//! [export]
//! sheet_name = "Archivos"
//! file_stem = "archivos"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Page size a fresh session starts with.
    pub page_size: usize,
    /// Page sizes a session may switch to.
    pub page_sizes: Vec<usize>,
    /// Listen address of the HTTP command service.
    pub bind_addr: String,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub sheet_name: String,
    /// Base name of exported files, suffixed with `_<year>` when filtered.
    pub file_stem: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_sizes: vec![10, 20, 30, 40, 50],
            bind_addr: "127.0.0.1:3000".to_string(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Archivos".to_string(),
            file_stem: "archivos".to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: RegistryConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_sizes.is_empty() || self.page_sizes.contains(&0) {
            return Err(ConfigError::Invalid(
                "page_sizes must be a non-empty list of positive sizes".into(),
            ));
        }
        if !self.page_sizes.contains(&self.page_size) {
            return Err(ConfigError::Invalid(format!(
                "page_size {} is not one of page_sizes {:?}",
                self.page_size, self.page_sizes
            )));
        }
        if self.export.file_stem.trim().is_empty() {
            return Err(ConfigError::Invalid("export.file_stem must not be empty".into()));
        }
        Ok(())
    }
}
