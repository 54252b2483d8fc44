//! Orientation corrections file parsing and threshold filtering.
//!
//! A corrections file has a one-line header followed by whitespace-separated
//! rows `STATION AZIMUTH [ERROR]`. The error column is detected per row: a
//! row without it has an error of 0, whatever the other rows look like.

use crate::error::{InventoryError, Result};
use crate::models::CorrectionRecord;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Records parsed from a corrections file, plus the number of unusable rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCorrections {
    pub records: Vec<CorrectionRecord>,
    pub rows_malformed: usize,
}

/// Corrections that passed the uncertainty threshold, keyed by station code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionSet {
    azimuths: HashMap<String, i32>,
    pub rejected: usize,
}

impl CorrectionSet {
    /// Keep records whose error does not exceed `accepted_error`.
    ///
    /// When a station appears more than once, the last accepted row wins.
    pub fn filter(records: &[CorrectionRecord], accepted_error: i32) -> Self {
        let mut set = Self::default();

        for record in records {
            if record.error > accepted_error {
                debug!(
                    "Rejecting correction for {}: error {} exceeds {}",
                    record.station, record.error, accepted_error
                );
                set.rejected += 1;
                continue;
            }
            set.azimuths.insert(record.station.clone(), record.azimuth);
        }

        set
    }

    /// Primary azimuth for a station, if it has an accepted correction
    pub fn azimuth(&self, station: &str) -> Option<i32> {
        self.azimuths.get(station).copied()
    }

    pub fn len(&self) -> usize {
        self.azimuths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.azimuths.is_empty()
    }

    /// Accepted station codes, sorted
    pub fn stations(&self) -> Vec<&str> {
        let mut stations: Vec<&str> = self.azimuths.keys().map(String::as_str).collect();
        stations.sort_unstable();
        stations
    }
}

enum Row {
    Record(CorrectionRecord),
    Malformed(String),
}

fn parse_row(line: &str) -> Row {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 {
        return Row::Malformed(format!("expected STATION AZIMUTH [ERROR], got '{}'", line));
    }

    let Ok(azimuth) = fields[1].parse::<i32>() else {
        return Row::Malformed(format!("invalid azimuth '{}'", fields[1]));
    };

    let error = match fields.get(2) {
        Some(value) => match value.parse::<i32>() {
            Ok(error) => error,
            Err(_) => return Row::Malformed(format!("invalid error '{}'", value)),
        },
        None => 0,
    };

    Row::Record(CorrectionRecord {
        station: fields[0].to_string(),
        azimuth,
        error,
    })
}

/// Parse corrections text, skipping `header_lines` leading lines
pub fn parse_corrections(text: &str, header_lines: usize) -> ParsedCorrections {
    let mut parsed = ParsedCorrections::default();

    for (line_num, line) in text.lines().enumerate().skip(header_lines) {
        if line.trim().is_empty() {
            continue;
        }

        match parse_row(line) {
            Row::Record(record) => parsed.records.push(record),
            Row::Malformed(reason) => {
                warn!("Skipping corrections line {}: {}", line_num + 1, reason);
                parsed.rows_malformed += 1;
            }
        }
    }

    parsed
}

/// Read and parse a corrections file
pub fn read_corrections(path: &Path, header_lines: usize) -> Result<ParsedCorrections> {
    let text = std::fs::read_to_string(path).map_err(|e| InventoryError::file_read(path, e))?;
    Ok(parse_corrections(&text, header_lines))
}
