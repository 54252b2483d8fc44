//! Configuration management and validation.
//!
//! Provides configuration structures for the catalog client and the two
//! input file formats. Values come from defaults, an optional TOML file,
//! and finally command-line overrides.

use crate::constants::{
    CORRECTIONS_HEADER_LINES, DEFAULT_ACCEPTED_ERROR, DEFAULT_CATALOG_URL, DEFAULT_TIMEOUT_SECS,
    STATION_LIST_HEADER_LINES, USER_AGENT,
};
use crate::error::{InventoryError, Result};
use crate::models::DetailLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// FDSN station service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Data centre base URL, without the `/fdsnws/...` path
    pub base_url: String,

    /// Timeout for a single network query, in seconds
    pub timeout_secs: u64,

    /// User agent sent with each request
    pub user_agent: String,

    /// Level of detail requested from the service
    pub level: DetailLevel,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: USER_AGENT.to_string(),
            level: DetailLevel::Response,
        }
    }
}

/// Station-list file layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationListConfig {
    /// Lines skipped before the first data row
    pub header_lines: usize,
}

impl Default for StationListConfig {
    fn default() -> Self {
        Self {
            header_lines: STATION_LIST_HEADER_LINES,
        }
    }
}

/// Corrections file layout and acceptance threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionsConfig {
    /// Lines skipped before the first data row
    pub header_lines: usize,

    /// Corrections with a larger uncertainty (degrees) are discarded
    pub accepted_error: i32,
}

impl Default for CorrectionsConfig {
    fn default() -> Self {
        Self {
            header_lines: CORRECTIONS_HEADER_LINES,
            accepted_error: DEFAULT_ACCEPTED_ERROR,
        }
    }
}

/// Global configuration for inventory building
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub catalog: CatalogConfig,
    pub station_list: StationListConfig,
    pub corrections: CorrectionsConfig,
}

impl InventoryConfig {
    /// Parse a TOML configuration document; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| InventoryError::file_read(path, e))?;
        let config = Self::from_toml_str(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Override the catalog base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.catalog.base_url = base_url.into();
        self
    }

    /// Override the catalog request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.catalog.timeout_secs = timeout_secs;
        self
    }

    /// Override the requested detail level
    pub fn with_level(mut self, level: DetailLevel) -> Self {
        self.catalog.level = level;
        self
    }

    /// Override the correction acceptance threshold
    pub fn with_accepted_error(mut self, accepted_error: i32) -> Self {
        self.corrections.accepted_error = accepted_error;
        self
    }

    /// Check values that would make every request or every correction fail
    pub fn validate(&self) -> Result<()> {
        let url = self.catalog.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(InventoryError::configuration(format!(
                "catalog.base_url must be an http(s) URL, got '{}'",
                self.catalog.base_url
            )));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(InventoryError::configuration(
                "catalog.timeout_secs must be greater than zero",
            ));
        }

        if self.corrections.accepted_error < 0 {
            return Err(InventoryError::configuration(format!(
                "corrections.accepted_error must not be negative, got {}",
                self.corrections.accepted_error
            )));
        }

        Ok(())
    }
}
