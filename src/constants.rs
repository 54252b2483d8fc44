//! Application constants for the OBS inventory builder
//!
//! File-format layout, FDSN service defaults, and the channel naming
//! convention used to identify horizontal components.

// =============================================================================
// Input File Layout
// =============================================================================

/// Header lines preceding the data rows of a station-list file
pub const STATION_LIST_HEADER_LINES: usize = 3;

/// Field separator in station-list rows
pub const STATION_LIST_DELIMITER: char = '|';

/// Header lines preceding the data rows of a corrections file
pub const CORRECTIONS_HEADER_LINES: usize = 1;

// =============================================================================
// Orientation Correction
// =============================================================================

/// Default maximum accepted uncertainty for an orientation correction, in degrees
pub const DEFAULT_ACCEPTED_ERROR: i32 = 180;

/// Channel code suffix of the primary horizontal component
pub const PRIMARY_HORIZONTAL_SUFFIX: char = '1';

/// Channel code suffix of the secondary horizontal component
pub const SECONDARY_HORIZONTAL_SUFFIX: char = '2';

/// Clockwise offset of the secondary horizontal from the primary, in degrees
pub const SECONDARY_OFFSET_DEG: i32 = 90;

/// Dip of a horizontal component
pub const HORIZONTAL_DIP_DEG: f64 = 0.0;

// =============================================================================
// FDSN Station Service
// =============================================================================

/// Default FDSN data centre (IRIS / EarthScope DMC)
pub const DEFAULT_CATALOG_URL: &str = "https://service.iris.edu";

/// Path of the FDSN station query endpoint, relative to the data centre URL
pub const FDSN_STATION_QUERY_PATH: &str = "/fdsnws/station/1/query";

/// Default HTTP timeout for a single catalog query
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Wildcard used for location and channel when the caller gives none
pub const WILDCARD: &str = "*";

/// User agent sent with catalog requests
pub const USER_AGENT: &str = concat!("obs-inventory/", env!("CARGO_PKG_VERSION"));
