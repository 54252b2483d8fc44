//! Core data structures for station-list import and orientation correction.
//!
//! Defines the transient records parsed from input files, the catalog query
//! detail level, and the reports returned alongside each operation.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `network|station` row of a station-list file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationRecord {
    pub network: String,
    pub station: String,
}

/// One row of an orientation corrections file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionRecord {
    pub station: String,
    /// Azimuth of the primary horizontal component, degrees clockwise from north
    pub azimuth: i32,
    /// Uncertainty of the azimuth in degrees; 0 when the row has no error column
    pub error: i32,
}

/// Level of detail requested from an FDSN station service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Network,
    Station,
    Channel,
    Response,
}

impl DetailLevel {
    /// Value of the `level` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::Network => "network",
            DetailLevel::Station => "station",
            DetailLevel::Channel => "channel",
            DetailLevel::Response => "response",
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A network whose catalog query failed and was left out of the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedNetwork {
    pub network: String,
    pub station_count: usize,
    pub reason: String,
}

/// Outcome of a station-list import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Data rows that yielded a station record
    pub rows_parsed: usize,
    /// Data rows dropped for having too few fields
    pub rows_skipped: usize,
    /// Networks merged into the inventory, in query order
    pub imported: Vec<String>,
    /// Networks whose query failed
    pub skipped: Vec<SkippedNetwork>,
}

impl ImportReport {
    pub fn networks_requested(&self) -> usize {
        self.imported.len() + self.skipped.len()
    }

    pub fn stations_skipped(&self) -> usize {
        self.skipped.iter().map(|s| s.station_count).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Outcome of applying an orientation corrections file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorrectionReport {
    /// Records that passed the uncertainty threshold
    pub records_accepted: usize,
    /// Records discarded for exceeding the uncertainty threshold
    pub records_rejected: usize,
    /// Rows that could not be parsed
    pub rows_malformed: usize,
    /// Station epochs whose horizontal channels were rewritten
    pub stations_corrected: usize,
    /// Channels whose azimuth and dip were set
    pub channels_updated: usize,
    /// Accepted stations with no counterpart in the inventory
    pub unmatched_stations: Vec<String>,
}
