//! Station-list importer.
//!
//! Reads a station list, groups it by network, and queries the catalog once
//! per network. A failed query skips that network and the import carries on;
//! the outcome of every group is recorded in the [`ImportReport`].

use crate::catalog::{StationCatalog, StationQuery};
use crate::constants::{STATION_LIST_HEADER_LINES, WILDCARD};
use crate::error::Result;
use crate::inventory::Inventory;
use crate::models::{DetailLevel, ImportReport, SkippedNetwork};
use crate::station_list::{NetworkGroups, group_by_network, join_stations, read_station_list};
use indicatif::ProgressBar;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

/// FDSN spelling of the blank location code
const BLANK_LOCATION: &str = "--";

/// Imports station lists through a [`StationCatalog`]
pub struct StationImporter<C> {
    catalog: C,
    header_lines: usize,
    level: DetailLevel,
    progress: Option<ProgressBar>,
}

impl<C: StationCatalog> StationImporter<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            header_lines: STATION_LIST_HEADER_LINES,
            level: DetailLevel::Response,
            progress: None,
        }
    }

    /// Number of header lines in the station list
    pub fn with_header_lines(mut self, header_lines: usize) -> Self {
        self.header_lines = header_lines;
        self
    }

    pub fn with_level(mut self, level: DetailLevel) -> Self {
        self.level = level;
        self
    }

    /// Report each network query on a progress bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Import every station named in `list_file`.
    ///
    /// Only an unreadable list file is an error. Networks whose query fails
    /// are absent from the returned inventory and listed in the report.
    pub fn import(
        &self,
        list_file: &Path,
        location: &str,
        channel: &str,
    ) -> Result<(Inventory, ImportReport)> {
        let parsed = read_station_list(list_file, self.header_lines)?;
        let groups = group_by_network(&parsed.records);

        let (inventory, mut report) = self.import_groups(&groups, location, channel);
        report.rows_parsed = parsed.records.len();
        report.rows_skipped = parsed.rows_skipped;

        Ok((inventory, report))
    }

    /// Query the catalog once per network group and merge the successes
    pub fn import_groups(
        &self,
        groups: &NetworkGroups,
        location: &str,
        channel: &str,
    ) -> (Inventory, ImportReport) {
        let mut inventory = Inventory::new();
        let mut report = ImportReport::default();

        if let Some(progress) = &self.progress {
            progress.set_length(groups.len() as u64);
        }

        for (network, stations) in groups {
            if let Some(progress) = &self.progress {
                progress.set_message(format!("{} ({} stations)", network, stations.len()));
            }

            let query = self.build_query(network, stations, location, channel);
            match self.catalog.get_stations(&query) {
                Ok(fetched) => {
                    inventory.merge(fetched);
                    report.imported.push(network.clone());
                    info!("Imported network {}", network);
                }
                Err(e) => {
                    warn!("Skipping network {}: {}", network, e);
                    report.skipped.push(SkippedNetwork {
                        network: network.clone(),
                        station_count: stations.len(),
                        reason: e.to_string(),
                    });
                }
            }

            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        (inventory, report)
    }

    fn build_query(
        &self,
        network: &str,
        stations: &BTreeSet<String>,
        location: &str,
        channel: &str,
    ) -> StationQuery {
        let location = match location.trim() {
            "" => BLANK_LOCATION,
            other => other,
        };
        let channel = match channel.trim() {
            "" => WILDCARD,
            other => other,
        };

        StationQuery {
            network: network.to_string(),
            stations: join_stations(stations),
            location: location.to_string(),
            channel: channel.to_string(),
            level: self.level,
        }
    }
}

/// Import a station list with default settings.
///
/// Equivalent to `StationImporter::new(catalog).import(list_file, location, channel)`.
pub fn import_stations<C: StationCatalog>(
    catalog: C,
    list_file: &Path,
    location: &str,
    channel: &str,
) -> Result<(Inventory, ImportReport)> {
    StationImporter::new(catalog).import(list_file, location, channel)
}
