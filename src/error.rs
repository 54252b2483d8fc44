//! Error handling for inventory import and orientation correction.
//!
//! Malformed rows and failed network queries are not errors here: they are
//! skipped and reported. These variants cover the failures a caller has to
//! fix, plus the per-network catalog failures captured in import reports.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog service returned HTTP {status}")]
    CatalogStatus { status: u16 },

    #[error("No data available for network {network}")]
    NoData { network: String },

    #[error("Invalid StationXML: {reason}")]
    StationXml { reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl InventoryError {
    /// Wrap an IO failure with the path that caused it
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    pub fn station_xml(reason: impl Into<String>) -> Self {
        Self::StationXml {
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<roxmltree::Error> for InventoryError {
    fn from(error: roxmltree::Error) -> Self {
        Self::StationXml {
            reason: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
