use chrono::{DateTime, NaiveDateTime};
use roxmltree::{Document, Node};

use crate::error::{InventoryError, Result};
use crate::inventory::{Channel, Inventory, Network, Station};

fn is_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && node.tag_name().name() == tag
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children().filter(move |n| is_tag(*n, tag))
}

fn child_text<'a>(node: Node<'a, 'a>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|n| is_tag(*n, tag))
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn child_string(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_text(node, tag).map(str::to_string)
}

fn parse_opt_f64(node: Node<'_, '_>, tag: &str) -> Result<Option<f64>> {
    child_text(node, tag)
        .map(|v| {
            v.parse::<f64>().map_err(|_| {
                InventoryError::station_xml(format!("invalid <{}> value '{}'", tag, v))
            })
        })
        .transpose()
}

/// StationXML dates are ISO 8601 and may or may not carry a zone or fraction
fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f").ok()
        })
}

fn attr_date(node: Node<'_, '_>, name: &str) -> Option<NaiveDateTime> {
    node.attribute(name).and_then(parse_date)
}

fn required_code(node: Node<'_, '_>) -> Result<String> {
    node.attribute("code")
        .map(|c| c.trim().to_string())
        .ok_or_else(|| {
            InventoryError::station_xml(format!(
                "<{}> element without a code attribute",
                node.tag_name().name()
            ))
        })
}

fn parse_channel(node: Node<'_, '_>) -> Result<Channel> {
    Ok(Channel {
        code: required_code(node)?,
        location_code: node
            .attribute("locationCode")
            .unwrap_or_default()
            .trim()
            .to_string(),
        start_date: attr_date(node, "startDate"),
        end_date: attr_date(node, "endDate"),
        latitude: parse_opt_f64(node, "Latitude")?,
        longitude: parse_opt_f64(node, "Longitude")?,
        elevation: parse_opt_f64(node, "Elevation")?,
        depth: parse_opt_f64(node, "Depth")?,
        azimuth: parse_opt_f64(node, "Azimuth")?,
        dip: parse_opt_f64(node, "Dip")?,
        sample_rate: parse_opt_f64(node, "SampleRate")?,
        sensor: children(node, "Sensor")
            .next()
            .and_then(|s| child_string(s, "Description").or_else(|| child_string(s, "Type"))),
    })
}

fn parse_station(node: Node<'_, '_>) -> Result<Station> {
    Ok(Station {
        code: required_code(node)?,
        site_name: children(node, "Site")
            .next()
            .and_then(|s| child_string(s, "Name")),
        start_date: attr_date(node, "startDate"),
        end_date: attr_date(node, "endDate"),
        latitude: parse_opt_f64(node, "Latitude")?,
        longitude: parse_opt_f64(node, "Longitude")?,
        elevation: parse_opt_f64(node, "Elevation")?,
        channels: children(node, "Channel")
            .map(parse_channel)
            .collect::<Result<Vec<_>>>()?,
    })
}

fn parse_network(node: Node<'_, '_>) -> Result<Network> {
    Ok(Network {
        code: required_code(node)?,
        description: child_string(node, "Description"),
        start_date: attr_date(node, "startDate"),
        end_date: attr_date(node, "endDate"),
        stations: children(node, "Station")
            .map(parse_station)
            .collect::<Result<Vec<_>>>()?,
    })
}

/// Parse an FDSNStationXML document into an inventory.
///
/// Only the elements the inventory model carries are read; response stages
/// and other metadata are ignored.
pub fn parse_station_xml(xml: &str) -> Result<Inventory> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    if !is_tag(root, "FDSNStationXML") {
        return Err(InventoryError::station_xml(format!(
            "expected <FDSNStationXML> root, found <{}>",
            root.tag_name().name()
        )));
    }

    Ok(Inventory {
        source: child_string(root, "Source"),
        networks: children(root, "Network")
            .map(parse_network)
            .collect::<Result<Vec<_>>>()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<FDSNStationXML xmlns="http://www.fdsn.org/xml/station/1" schemaVersion="1.1">
  <Source>IRIS-DMC</Source>
  <Sender>IRIS-DMC</Sender>
  <Created>2024-03-01T12:00:00.0000</Created>
  <Network code="XO" startDate="2018-01-01T00:00:00.0000" endDate="2019-12-31T23:59:59.0000">
    <Description>Alaska Amphibious Community Seismic Experiment</Description>
    <Station code="LA21" startDate="2018-05-01T00:00:00Z">
      <Latitude>54.8</Latitude>
      <Longitude>-155.5</Longitude>
      <Elevation>-2410.0</Elevation>
      <Site><Name>Shumagin Gap OBS</Name></Site>
      <Channel code="BH1" locationCode="" startDate="2018-05-01T00:00:00">
        <Latitude>54.8</Latitude>
        <Longitude>-155.5</Longitude>
        <Elevation>-2410.0</Elevation>
        <Depth>0</Depth>
        <Azimuth>0.0</Azimuth>
        <Dip>0.0</Dip>
        <SampleRate>50</SampleRate>
        <Sensor><Description>Trillium Compact OBS</Description></Sensor>
        <Response/>
      </Channel>
      <Channel code="BHZ" locationCode="">
        <Azimuth>0.0</Azimuth>
        <Dip>-90.0</Dip>
      </Channel>
      <Channel code="HDH" locationCode="">
        <SampleRate>50</SampleRate>
      </Channel>
    </Station>
  </Network>
</FDSNStationXML>"#;

    #[test]
    fn test_parse_sample_document() {
        let inventory = parse_station_xml(SAMPLE).unwrap();

        assert_eq!(inventory.source.as_deref(), Some("IRIS-DMC"));
        assert_eq!(inventory.network_count(), 1);

        let network = &inventory.networks[0];
        assert_eq!(network.code, "XO");
        assert_eq!(
            network.description.as_deref(),
            Some("Alaska Amphibious Community Seismic Experiment")
        );
        assert!(network.start_date.is_some());
        assert!(network.end_date.is_some());

        let station = &network.stations[0];
        assert_eq!(station.code, "LA21");
        assert_eq!(station.site_name.as_deref(), Some("Shumagin Gap OBS"));
        assert_eq!(station.elevation, Some(-2410.0));
        assert!(station.start_date.is_some());
        assert_eq!(station.channels.len(), 3);

        let bh1 = &station.channels[0];
        assert_eq!(bh1.code, "BH1");
        assert_eq!(bh1.location_code, "");
        assert_eq!(bh1.azimuth, Some(0.0));
        assert_eq!(bh1.dip, Some(0.0));
        assert_eq!(bh1.sample_rate, Some(50.0));
        assert_eq!(bh1.sensor.as_deref(), Some("Trillium Compact OBS"));

        let hdh = &station.channels[2];
        assert_eq!(hdh.azimuth, None);
        assert_eq!(hdh.dip, None);
    }

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDateTime::parse_from_str("2018-05-01 00:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(parse_date("2018-05-01T00:00:00"), Some(expected));
        assert_eq!(parse_date("2018-05-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_date("2018-05-01T00:00:00.0000"), Some(expected));
        assert_eq!(parse_date("2018-05-01T00:00:00+00:00"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_wrong_root_rejected() {
        let err = parse_station_xml("<quakeml/>").unwrap_err();
        assert!(matches!(err, InventoryError::StationXml { .. }));
    }

    #[test]
    fn test_malformed_xml_rejected() {
        let err = parse_station_xml("<FDSNStationXML><Network").unwrap_err();
        assert!(matches!(err, InventoryError::StationXml { .. }));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let xml = r#"<FDSNStationXML><Network code="XO"><Station code="A">
            <Latitude>north</Latitude></Station></Network></FDSNStationXML>"#;
        let err = parse_station_xml(xml).unwrap_err();
        assert!(err.to_string().contains("Latitude"));
    }

    #[test]
    fn test_missing_code_rejected() {
        let xml = r#"<FDSNStationXML><Network><Station code="A"/></Network></FDSNStationXML>"#;
        let err = parse_station_xml(xml).unwrap_err();
        assert!(err.to_string().contains("code"));
    }
}
