//! Remote station catalog access
//!
//! The importer talks to a catalog only through [`StationCatalog`], so the
//! HTTP client is an explicit dependency and tests can substitute an
//! in-memory catalog.

use crate::error::Result;
use crate::inventory::Inventory;
use crate::models::DetailLevel;

pub mod fdsn;
pub mod stationxml;

pub use fdsn::FdsnClient;

/// One catalog request: a network and the stations wanted from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationQuery {
    pub network: String,
    /// Comma-separated station codes
    pub stations: String,
    pub location: String,
    pub channel: String,
    pub level: DetailLevel,
}

/// A source of station metadata, such as an FDSN station web service
pub trait StationCatalog {
    /// Fetch the metadata matching `query`.
    ///
    /// Any failure, whether transport, HTTP status or an empty result, is
    /// reported as an error; callers decide whether to skip or abort.
    fn get_stations(&self, query: &StationQuery) -> Result<Inventory>;
}

impl<T: StationCatalog + ?Sized> StationCatalog for &T {
    fn get_stations(&self, query: &StationQuery) -> Result<Inventory> {
        (**self).get_stations(query)
    }
}
