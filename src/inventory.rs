//! Station inventory: the Network → Station → Channel metadata tree.
//!
//! The tree mirrors the parts of FDSN StationXML that inventory building and
//! orientation correction touch. Inventories are produced by a
//! [`StationCatalog`](crate::catalog::StationCatalog), merged by the importer,
//! mutated in place by the corrector, and persisted as JSON.

use crate::catalog::stationxml::parse_station_xml;
use crate::error::{InventoryError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A collection of networks, as returned by one or more catalog queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Data centre or tool that produced the inventory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub networks: Vec<Network>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub stations: Vec<Station>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Metres above sea level; negative for ocean-bottom sites
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// A single sensor component at a station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub code: String,
    #[serde(default)]
    pub location_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    /// Degrees clockwise from north, in [0, 360)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azimuth: Option<f64>,
    /// Degrees below horizontal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dip: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor: Option<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Append another inventory's networks.
    ///
    /// Networks are appended rather than unified by code: the same code may
    /// legitimately appear as several epochs of a temporary network.
    pub fn merge(&mut self, other: Inventory) {
        if self.source.is_none() {
            self.source = other.source;
        }
        self.networks.extend(other.networks);
    }

    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    pub fn station_count(&self) -> usize {
        self.networks.iter().map(|n| n.stations.len()).sum()
    }

    pub fn channel_count(&self) -> usize {
        self.stations().map(|s| s.channels.len()).sum()
    }

    /// All stations, across networks
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.networks.iter().flat_map(|n| n.stations.iter())
    }

    /// All stations, across networks, for in-place edits
    pub fn stations_mut(&mut self) -> impl Iterator<Item = &mut Station> {
        self.networks.iter_mut().flat_map(|n| n.stations.iter_mut())
    }

    /// Look up a channel by its `NET.STA.LOC.CHA` parts (first epoch wins)
    pub fn find_channel(
        &self,
        network: &str,
        station: &str,
        location: &str,
        channel: &str,
    ) -> Option<&Channel> {
        self.networks
            .iter()
            .filter(|n| n.code == network)
            .flat_map(|n| n.stations.iter())
            .filter(|s| s.code == station)
            .flat_map(|s| s.channels.iter())
            .find(|c| c.location_code == location && c.code == channel)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load an inventory saved as JSON, or a StationXML document (`.xml`)
    pub fn from_path(path: &Path) -> Result<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| InventoryError::file_read(path, e))?;

        let inventory = if is_station_xml(path) {
            parse_station_xml(&text)?
        } else {
            Self::from_json(&text)?
        };

        debug!(
            "Loaded inventory from {}: {} networks, {} stations",
            path.display(),
            inventory.network_count(),
            inventory.station_count()
        );
        Ok(inventory)
    }

    /// Write the inventory as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| InventoryError::file_write(path, e))?;
        debug!("Wrote inventory to {}", path.display());
        Ok(())
    }
}

/// Whether `path` names a StationXML document rather than a saved JSON inventory
pub fn is_station_xml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
}
