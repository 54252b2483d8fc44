//! OBS Inventory Library
//!
//! Builds seismic station inventories from FDSN station web services and
//! corrects the horizontal orientation of ocean-bottom seismometer channels.
//!
//! This library provides tools for:
//! - Parsing pipe-delimited station lists and grouping them by network
//! - Querying an FDSN station service once per network, skipping failures
//! - Reading FDSN StationXML into a Network → Station → Channel tree
//! - Applying per-station azimuth corrections filtered by uncertainty
//! - Saving and loading inventories as JSON

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod corrections;
pub mod error;
pub mod importer;
pub mod inventory;
pub mod models;
pub mod orientation;
pub mod station_list;

// Re-export commonly used types
pub use catalog::{FdsnClient, StationCatalog, StationQuery};
pub use config::InventoryConfig;
pub use error::{InventoryError, Result};
pub use importer::{StationImporter, import_stations};
pub use inventory::{Channel, Inventory, Network, Station};
pub use models::{CorrectionRecord, CorrectionReport, DetailLevel, ImportReport, StationRecord};
pub use orientation::{OrientationCorrector, apply_orientation_corrections};
