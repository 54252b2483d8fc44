//! Integration tests for applying orientation corrections files
//!
//! Inventories are read from StationXML fixtures written to temp files, then
//! corrected and saved the way the `correct` command does it.

use obs_inventory::{Inventory, OrientationCorrector, apply_orientation_corrections};
use std::io::Write;
use tempfile::{Builder, NamedTempFile, tempdir};

const OBS_STATIONXML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<FDSNStationXML xmlns="http://www.fdsn.org/xml/station/1" schemaVersion="1.1">
  <Source>IRIS-DMC</Source>
  <Network code="YH">
    <Station code="OBS01">
      <Elevation>-3000</Elevation>
      <Channel code="BH1" locationCode=""><Azimuth>0</Azimuth><Dip>0</Dip></Channel>
      <Channel code="BH2" locationCode=""><Azimuth>90</Azimuth><Dip>0</Dip></Channel>
      <Channel code="BHZ" locationCode=""><Azimuth>0</Azimuth><Dip>-90</Dip></Channel>
      <Channel code="BDH" locationCode=""><Azimuth>0</Azimuth><Dip>0</Dip></Channel>
    </Station>
    <Station code="OBS02">
      <Channel code="BH1" locationCode=""><Azimuth>0</Azimuth><Dip>0</Dip></Channel>
      <Channel code="BH2" locationCode=""><Azimuth>90</Azimuth><Dip>0</Dip></Channel>
    </Station>
    <Station code="OBS03">
      <Channel code="BH1" locationCode=""><Azimuth>0</Azimuth><Dip>0</Dip></Channel>
      <Channel code="BH2" locationCode=""><Azimuth>90</Azimuth><Dip>0</Dip></Channel>
    </Station>
  </Network>
</FDSNStationXML>
"#;

fn load_fixture() -> Inventory {
    let mut xml = Builder::new().suffix(".xml").tempfile().unwrap();
    xml.write_all(OBS_STATIONXML.as_bytes()).unwrap();
    Inventory::from_path(xml.path()).unwrap()
}

fn corrections_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

fn azimuth_dip(inventory: &Inventory, station: &str, channel: &str) -> (Option<f64>, Option<f64>) {
    let c = inventory.find_channel("YH", station, "", channel).unwrap();
    (c.azimuth, c.dip)
}

#[test]
fn test_channel_targeting_from_file() {
    let mut inventory = load_fixture();
    let file = corrections_file("station azimuth error\nOBS01 45 3\n");

    let report = apply_orientation_corrections(&mut inventory, file.path(), 180).unwrap();

    assert_eq!(azimuth_dip(&inventory, "OBS01", "BH1"), (Some(45.0), Some(0.0)));
    assert_eq!(azimuth_dip(&inventory, "OBS01", "BH2"), (Some(135.0), Some(0.0)));
    assert_eq!(azimuth_dip(&inventory, "OBS01", "BHZ"), (Some(0.0), Some(-90.0)));
    assert_eq!(azimuth_dip(&inventory, "OBS01", "BDH"), (Some(0.0), Some(0.0)));
    assert_eq!(report.stations_corrected, 1);
    assert_eq!(report.channels_updated, 2);
}

#[test]
fn test_azimuth_wrap() {
    let mut inventory = load_fixture();
    let file = corrections_file("station azimuth\nOBS01 300\nOBS02 10\nOBS03 350\n");

    apply_orientation_corrections(&mut inventory, file.path(), 180).unwrap();

    assert_eq!(azimuth_dip(&inventory, "OBS01", "BH2").0, Some(30.0));
    assert_eq!(azimuth_dip(&inventory, "OBS02", "BH2").0, Some(100.0));
    assert_eq!(azimuth_dip(&inventory, "OBS03", "BH2").0, Some(80.0));
}

#[test]
fn test_threshold_filter() {
    let mut inventory = load_fixture();
    let file = corrections_file("station azimuth error\nOBS01 45 15\nOBS02 60 5\n");

    let report = apply_orientation_corrections(&mut inventory, file.path(), 10).unwrap();

    assert_eq!(azimuth_dip(&inventory, "OBS01", "BH1").0, Some(0.0));
    assert_eq!(azimuth_dip(&inventory, "OBS02", "BH1").0, Some(60.0));
    assert_eq!(report.records_accepted, 1);
    assert_eq!(report.records_rejected, 1);
}

#[test]
fn test_mixed_error_columns_are_filtered_per_row() {
    let mut inventory = load_fixture();
    // First data row has no error column; the second row's error still counts
    let file = corrections_file("station azimuth error\nOBS01 45\nOBS02 60 50\n");

    apply_orientation_corrections(&mut inventory, file.path(), 10).unwrap();

    assert_eq!(azimuth_dip(&inventory, "OBS01", "BH1").0, Some(45.0));
    assert_eq!(azimuth_dip(&inventory, "OBS02", "BH1").0, Some(0.0));
}

#[test]
fn test_unknown_station_is_ignored() {
    let mut inventory = load_fixture();
    let before = inventory.clone();
    let file = corrections_file("station azimuth\nNOPE 45\n");

    let report = apply_orientation_corrections(&mut inventory, file.path(), 180).unwrap();

    assert_eq!(inventory, before);
    assert_eq!(report.unmatched_stations, vec!["NOPE"]);
}

#[test]
fn test_applying_twice_is_idempotent() {
    let file = corrections_file("station azimuth error\nOBS01 300 2\nOBS02 10 1\n");

    let mut once = load_fixture();
    apply_orientation_corrections(&mut once, file.path(), 180).unwrap();

    let mut twice = once.clone();
    apply_orientation_corrections(&mut twice, file.path(), 180).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_corrected_inventory_survives_json_save() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("corrected.json");
    let file = corrections_file("station azimuth\nOBS02 200\n");

    let mut inventory = load_fixture();
    OrientationCorrector::new()
        .with_accepted_error(5)
        .apply(&mut inventory, file.path())
        .unwrap();
    inventory.save(&output).unwrap();

    let reloaded = Inventory::from_path(&output).unwrap();
    assert_eq!(azimuth_dip(&reloaded, "OBS02", "BH1"), (Some(200.0), Some(0.0)));
    assert_eq!(azimuth_dip(&reloaded, "OBS02", "BH2"), (Some(290.0), Some(0.0)));
}

#[test]
fn test_missing_corrections_file_is_an_error() {
    let mut inventory = load_fixture();
    let result = apply_orientation_corrections(
        &mut inventory,
        std::path::Path::new("/nonexistent/orientations.txt"),
        180,
    );
    assert!(result.is_err());
}
