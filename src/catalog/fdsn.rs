//! FDSN Station Web Service Client
//!
//! Retrieves station and channel metadata as StationXML from any data centre
//! implementing the FDSN `fdsnws-station` v1 web service.
//!
//! Service description: https://www.fdsn.org/webservices/fdsnws-station-1.1.pdf
//! IRIS endpoint: https://service.iris.edu/fdsnws/station/1/

use super::stationxml::parse_station_xml;
use super::{StationCatalog, StationQuery};
use crate::config::CatalogConfig;
use crate::constants::FDSN_STATION_QUERY_PATH;
use crate::error::{InventoryError, Result};
use crate::inventory::Inventory;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Blocking HTTP client for one FDSN data centre
pub struct FdsnClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl FdsnClient {
    /// Build a client from catalog settings
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the station query endpoint
    pub fn query_url(&self) -> String {
        format!("{}{}", self.base_url, FDSN_STATION_QUERY_PATH)
    }
}

/// Query parameters for a station request, in FDSN names
fn query_params(query: &StationQuery) -> [(&'static str, &str); 6] {
    [
        ("network", query.network.as_str()),
        ("station", query.stations.as_str()),
        ("location", query.location.as_str()),
        ("channel", query.channel.as_str()),
        ("level", query.level.as_str()),
        ("format", "xml"),
    ]
}

impl StationCatalog for FdsnClient {
    fn get_stations(&self, query: &StationQuery) -> Result<Inventory> {
        let url = self.query_url();
        debug!(
            "GET {} network={} station={}",
            url, query.network, query.stations
        );

        let response = self
            .client
            .get(&url)
            .query(&query_params(query))
            .header("Accept", "application/xml")
            .send()?;

        check_status(response.status(), &query.network)?;

        let body = response.text()?;
        non_empty(parse_station_xml(&body)?, &query.network)
    }
}

/// Map a service status to `NoData`, `CatalogStatus` or success
fn check_status(status: StatusCode, network: &str) -> Result<()> {
    // FDSN services answer 204 (or 404 when asked to) for an empty match
    if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_FOUND {
        return Err(InventoryError::NoData {
            network: network.to_string(),
        });
    }
    if !status.is_success() {
        return Err(InventoryError::CatalogStatus {
            status: status.as_u16(),
        });
    }
    Ok(())
}

fn non_empty(inventory: Inventory, network: &str) -> Result<Inventory> {
    if inventory.is_empty() {
        return Err(InventoryError::NoData {
            network: network.to_string(),
        });
    }
    Ok(inventory)
}
