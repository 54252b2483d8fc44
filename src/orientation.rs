//! OBS horizontal-component orientation correction.
//!
//! Ocean-bottom seismometers land on the sea floor with unknown horizontal
//! orientation. Given a measured azimuth for the primary horizontal
//! component (channel code ending `1`), the secondary component (ending `2`)
//! is set 90 degrees clockwise of it and both are marked horizontal.

use crate::constants::{
    CORRECTIONS_HEADER_LINES, DEFAULT_ACCEPTED_ERROR, HORIZONTAL_DIP_DEG,
    PRIMARY_HORIZONTAL_SUFFIX, SECONDARY_HORIZONTAL_SUFFIX, SECONDARY_OFFSET_DEG,
};
use crate::corrections::{CorrectionSet, read_corrections};
use crate::error::Result;
use crate::inventory::{Inventory, Station};
use crate::models::CorrectionReport;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

/// Primary and secondary horizontal azimuths for a primary azimuth, both in [0, 360)
pub fn horizontal_azimuths(primary: i32) -> (f64, f64) {
    let primary = primary.rem_euclid(360);
    let secondary = (primary + SECONDARY_OFFSET_DEG).rem_euclid(360);
    (f64::from(primary), f64::from(secondary))
}

/// Rewrite a station's horizontal channels; returns the number of channels set
fn correct_station(station: &mut Station, primary: i32) -> usize {
    let (primary, secondary) = horizontal_azimuths(primary);
    let mut updated = 0;

    for channel in &mut station.channels {
        let azimuth = if channel.code.ends_with(PRIMARY_HORIZONTAL_SUFFIX) {
            primary
        } else if channel.code.ends_with(SECONDARY_HORIZONTAL_SUFFIX) {
            secondary
        } else {
            continue;
        };

        channel.azimuth = Some(azimuth);
        channel.dip = Some(HORIZONTAL_DIP_DEG);
        updated += 1;
    }

    updated
}

/// Apply accepted corrections to every matching station in the inventory.
///
/// Every epoch of a matching station is corrected. Stations without a
/// correction are untouched. The report's record counts are left at zero.
pub fn apply_correction_set(
    inventory: &mut Inventory,
    corrections: &CorrectionSet,
) -> CorrectionReport {
    let mut report = CorrectionReport::default();
    let mut matched = BTreeSet::new();

    for station in inventory.stations_mut() {
        let Some(primary) = corrections.azimuth(&station.code) else {
            continue;
        };

        let updated = correct_station(station, primary);
        debug!(
            "Corrected {}: primary azimuth {}, {} channels",
            station.code, primary, updated
        );

        matched.insert(station.code.clone());
        report.stations_corrected += 1;
        report.channels_updated += updated;
    }

    report.unmatched_stations = corrections
        .stations()
        .into_iter()
        .filter(|s| !matched.contains(*s))
        .map(str::to_string)
        .collect();

    report
}

/// Applies orientation corrections files to inventories
#[derive(Debug, Clone)]
pub struct OrientationCorrector {
    accepted_error: i32,
    header_lines: usize,
}

impl Default for OrientationCorrector {
    fn default() -> Self {
        Self {
            accepted_error: DEFAULT_ACCEPTED_ERROR,
            header_lines: CORRECTIONS_HEADER_LINES,
        }
    }
}

impl OrientationCorrector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Corrections with a larger uncertainty are discarded
    pub fn with_accepted_error(mut self, accepted_error: i32) -> Self {
        self.accepted_error = accepted_error;
        self
    }

    pub fn with_header_lines(mut self, header_lines: usize) -> Self {
        self.header_lines = header_lines;
        self
    }

    /// Read `corrections_file` and correct the inventory in place.
    ///
    /// Only an unreadable corrections file is an error.
    pub fn apply(
        &self,
        inventory: &mut Inventory,
        corrections_file: &Path,
    ) -> Result<CorrectionReport> {
        let parsed = read_corrections(corrections_file, self.header_lines)?;
        let corrections = CorrectionSet::filter(&parsed.records, self.accepted_error);

        let mut report = apply_correction_set(inventory, &corrections);
        report.records_accepted = parsed.records.len() - corrections.rejected;
        report.records_rejected = corrections.rejected;
        report.rows_malformed = parsed.rows_malformed;

        info!(
            "Corrected {} stations ({} channels); {} corrections rejected above {} degrees",
            report.stations_corrected,
            report.channels_updated,
            report.records_rejected,
            self.accepted_error
        );
        Ok(report)
    }
}

/// Apply a corrections file to an inventory in place.
///
/// Equivalent to `OrientationCorrector::new().with_accepted_error(accepted_error).apply(..)`.
pub fn apply_orientation_corrections(
    inventory: &mut Inventory,
    corrections_file: &Path,
    accepted_error: i32,
) -> Result<CorrectionReport> {
    OrientationCorrector::new()
        .with_accepted_error(accepted_error)
        .apply(inventory, corrections_file)
}
