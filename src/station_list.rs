//! Station-list parsing and network grouping.
//!
//! A station list is a pipe-delimited text export such as the one the IRIS
//! GMAP station viewer produces: a fixed header followed by rows whose first
//! two fields are the network and station codes.

use crate::constants::STATION_LIST_DELIMITER;
use crate::error::{InventoryError, Result};
use crate::models::StationRecord;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

/// Station codes grouped by network; every set is non-empty
pub type NetworkGroups = BTreeMap<String, BTreeSet<String>>;

/// Records parsed from a station list, plus the number of rows dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedStationList {
    pub records: Vec<StationRecord>,
    pub rows_skipped: usize,
}

/// Parse one data row; `None` when it has fewer than two usable fields
fn parse_row(line: &str) -> Option<StationRecord> {
    let mut fields = line.split(STATION_LIST_DELIMITER).map(str::trim);
    let network = fields.next()?;
    let station = fields.next()?;

    if network.is_empty() || station.is_empty() {
        return None;
    }

    Some(StationRecord {
        network: network.to_string(),
        station: station.to_string(),
    })
}

/// Parse station-list text, skipping `header_lines` leading lines
pub fn parse_station_list(text: &str, header_lines: usize) -> ParsedStationList {
    let mut parsed = ParsedStationList::default();

    for line in text.lines().skip(header_lines) {
        if line.trim().is_empty() {
            continue;
        }

        match parse_row(line) {
            Some(record) => parsed.records.push(record),
            None => parsed.rows_skipped += 1,
        }
    }

    debug!(
        "Parsed station list: {} records, {} rows skipped",
        parsed.records.len(),
        parsed.rows_skipped
    );
    parsed
}

/// Read and parse a station-list file
pub fn read_station_list(path: &Path, header_lines: usize) -> Result<ParsedStationList> {
    let text = std::fs::read_to_string(path).map_err(|e| InventoryError::file_read(path, e))?;
    Ok(parse_station_list(&text, header_lines))
}

/// Group station codes by network, dropping duplicates
pub fn group_by_network(records: &[StationRecord]) -> NetworkGroups {
    let mut groups = NetworkGroups::new();
    for record in records {
        groups
            .entry(record.network.clone())
            .or_default()
            .insert(record.station.clone());
    }
    groups
}

/// Join a network's station codes into the comma-separated query form
pub fn join_stations(stations: &BTreeSet<String>) -> String {
    stations.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    const GMAP_EXPORT: &str = "\
#Network | Station | Latitude | Longitude | Elevation | Sitename | StartTime | EndTime
#
#
XO|LA21|54.8|-155.5|-2410.0|Shumagin Gap|2018-05-01T00:00:00|2019-08-01T00:00:00
XO|LA22|54.6|-155.1|-2100.0|Shumagin Gap|2018-05-01T00:00:00|2019-08-01T00:00:00
YH|OBS01|-20.1|-175.2|-3000.0|Lau Basin|2009-10-01T00:00:00|2010-12-01T00:00:00
not a station row
XO|LA21|54.8|-155.5|-2410.0|duplicate row|2018-05-01T00:00:00|2019-08-01T00:00:00
";

    fn record(network: &str, station: &str) -> StationRecord {
        StationRecord {
            network: network.to_string(),
            station: station.to_string(),
        }
    }

    #[test]
    fn test_parse_skips_header_and_short_rows() {
        let parsed = parse_station_list(GMAP_EXPORT, 3);

        assert_eq!(parsed.records.len(), 4);
        assert_eq!(parsed.rows_skipped, 1);
        assert_eq!(parsed.records[0], record("XO", "LA21"));
        assert_eq!(parsed.records[2], record("YH", "OBS01"));
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let parsed = parse_station_list("#a\n#b\n#c\n", 3);
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.rows_skipped, 0);
    }

    #[test]
    fn test_header_rows_never_parsed_as_data() {
        // A header line that looks like data must still be skipped
        let parsed = parse_station_list("XO|HDR\n#\n#\nXO|LA21\n", 3);
        assert_eq!(parsed.records, vec![record("XO", "LA21")]);
    }

    #[test]
    fn test_fields_are_trimmed_and_blank_codes_dropped() {
        let parsed = parse_station_list(" XO | LA21 |x\n|LA22\nXO|\n\n", 0);
        assert_eq!(parsed.records, vec![record("XO", "LA21")]);
        assert_eq!(parsed.rows_skipped, 2);
    }

    #[test]
    fn test_two_field_row_accepted() {
        let parsed = parse_station_list("XO|LA21\n", 0);
        assert_eq!(parsed.records, vec![record("XO", "LA21")]);
    }

    #[test]
    fn test_group_by_network_dedups() {
        let parsed = parse_station_list(GMAP_EXPORT, 3);
        let groups = group_by_network(&parsed.records);

        assert_eq!(groups.len(), 2);
        assert_eq!(join_stations(&groups["XO"]), "LA21,LA22");
        assert_eq!(join_stations(&groups["YH"]), "OBS01");
        assert!(groups.values().all(|stations| !stations.is_empty()));
    }
}
