//! XML decoding of radiko responses
//!
//! Two document shapes are served:
//!
//! ```text
//! <radiko>                      <stations area_id="JP13">
//!   <stations>                    <station>
//!     <station id="TBS">            <id>TBS</id>
//!       <name>…</name>              <name>…</name>
//!       <progs>…</progs>          </station>
//!     </station>                </stations>
//!   </stations>
//! </radiko>
//! ```
//!
//! The left one answers program queries (by date, now-playing, weekly and
//! per-station date); the right one is the area station list. The v2
//! now-playing document nests `<progs>` one level deeper, inside `<scd>`.

use crate::error::Result;
use crate::models::{Program, RadioStation, Schedule, Station};
use serde::Deserialize;
use tracing::debug;

/// `<radiko>` root of program documents
#[derive(Debug, Deserialize)]
struct RadikoDocument {
    #[serde(default)]
    stations: StationsElement,
}

#[derive(Debug, Default, Deserialize)]
struct StationsElement {
    #[serde(rename = "station", default)]
    stations: Vec<Station>,
}

/// `<stations>` root of the area station list
#[derive(Debug, Deserialize)]
struct StationListDocument {
    #[serde(rename = "@area_id", default)]
    area_id: String,
    #[serde(rename = "station", default)]
    stations: Vec<RadioStation>,
}

/// Decode a program document into a schedule snapshot
pub fn decode_stations(body: &str) -> Result<Schedule> {
    let doc: RadikoDocument = quick_xml::de::from_str(body)?;
    debug!("Decoded {} stations", doc.stations.stations.len());
    Ok(Schedule::new(doc.stations.stations))
}

/// Decode a single-station program document into its programs
///
/// Only the first station is considered; a document without stations
/// yields no programs.
pub fn decode_programs(body: &str) -> Result<Vec<Program>> {
    let schedule = decode_stations(body)?;
    Ok(schedule
        .into_iter()
        .next()
        .map(|station| station.programs().cloned().collect())
        .unwrap_or_default())
}

/// Decode the area station list
pub fn decode_radio_stations(body: &str) -> Result<Vec<RadioStation>> {
    let doc: StationListDocument = quick_xml::de::from_str(body)?;
    debug!(
        "Decoded {} stations for area {}",
        doc.stations.len(),
        doc.area_id
    );
    Ok(doc.stations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;

    const PROGRAMS_XML: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<radiko>
  <ttl>1800</ttl>
  <srvtime>1704060000</srvtime>
  <stations>
    <station id="JOAK">
      <name>NHK Radio 1</name>
      <progs>
        <date>20240101</date>
        <prog id="1001" master_id="" ft="20240101050000" to="20240101060000" ftl="0500" tol="0600" dur="3600">
          <title>Morning News</title>
          <url>https://example.jp/news</url>
          <failed_record>0</failed_record>
          <ts_in_ng>0</ts_in_ng>
          <desc/>
          <info>&lt;p&gt;Headlines&lt;/p&gt;</info>
          <pfm>Announcer</pfm>
          <img>https://example.jp/news.png</img>
          <genre>
            <program id="P001"><name>News</name></program>
          </genre>
          <metas>
            <meta name="twitter" value="#news"/>
          </metas>
        </prog>
        <prog ft="20240101060000" to="20240101063000" ftl="0600" tol="0630" dur="1800">
          <title>Weather</title>
        </prog>
      </progs>
    </station>
    <station id="TBS">
      <name>TBS Radio</name>
      <progs>
        <date>20240101</date>
      </progs>
    </station>
  </stations>
</radiko>"##;

    const STATION_LIST_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<stations area_id="JP13" area_name="TOKYO JAPAN">
  <station>
    <id>TBS</id>
    <name>TBS Radio</name>
    <ascii_name>TBS RADIO</ascii_name>
    <areafree>1</areafree>
    <timefree>1</timefree>
    <logo width="224" height="100">https://example.jp/tbs/logo.png</logo>
    <logo width="448" height="200">https://example.jp/tbs/logo_large.png</logo>
    <banner>https://example.jp/tbs/banner.png</banner>
    <href>https://www.tbsradio.jp/</href>
  </station>
  <station>
    <id>QRR</id>
    <name>Nippon Cultural Broadcasting</name>
  </station>
</stations>"#;

    #[test]
    fn test_decode_stations() {
        let schedule = decode_stations(PROGRAMS_XML).unwrap();
        assert_eq!(schedule.len(), 2);

        let joak = schedule.station("JOAK").unwrap();
        assert_eq!(joak.name, "NHK Radio 1");
        assert_eq!(joak.listings[0].date, "20240101");

        let programs: Vec<&Program> = joak.programs().collect();
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].id, "1001");
        assert_eq!(programs[0].ft, "20240101050000");
        assert_eq!(programs[0].to, "20240101060000");
        assert_eq!(programs[0].ftl, "0500");
        assert_eq!(programs[0].dur, Some(3600));
        assert_eq!(programs[0].title, "Morning News");
        assert_eq!(programs[0].desc, "");
        assert_eq!(programs[0].info, "<p>Headlines</p>");
        assert_eq!(programs[0].pfm, "Announcer");
        assert_eq!(programs[1].title, "Weather");
        assert_eq!(programs[1].id, "");

        assert_eq!(schedule.station("TBS").unwrap().programs().count(), 0);
    }

    #[test]
    fn test_decode_weekly_listing() {
        let xml = r#"<radiko><stations><station id="TBS"><name>TBS Radio</name>
            <progs><date>20240101</date><prog ft="20240101050000" to="20240101060000"><title>A</title></prog></progs>
            <progs><date>20240102</date><prog ft="20240102050000" to="20240102060000"><title>B</title></prog></progs>
        </station></stations></radiko>"#;

        let schedule = decode_stations(xml).unwrap();
        let station = schedule.station("TBS").unwrap();
        assert_eq!(station.listings.len(), 2);
        let titles: Vec<&str> = station.programs().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[test]
    fn test_decode_scd_listing() {
        let xml = r#"<radiko><stations><station id="TBS"><name>TBS</name><scd><progs>
            <date>20240101</date>
            <prog ft="20240101050000" to="20240101060000"><title>Wrapped</title></prog>
        </progs></scd></station></stations></radiko>"#;

        let schedule = decode_stations(xml).unwrap();
        let station = schedule.station("TBS").unwrap();
        assert!(station.listings.is_empty());
        assert_eq!(station.scd.as_ref().unwrap().listings[0].date, "20240101");
        assert_eq!(station.programs().count(), 1);

        let start = crate::timestamp::jst()
            .with_ymd_and_hms(2024, 1, 1, 5, 0, 0)
            .unwrap();
        let found =
            crate::locator::find_program_starting_at(schedule.as_slice(), "TBS", &start).unwrap();
        assert_eq!(found.title, "Wrapped");

        let programs = decode_programs(xml).unwrap();
        let found = crate::locator::find_program_covering(&programs, "20240101053000").unwrap();
        assert_eq!(found.title, "Wrapped");

        assert_eq!(decode_programs(xml).unwrap().len(), 1);
    }

    #[test]
    fn test_decode_programs_takes_first_station() {
        let programs = decode_programs(PROGRAMS_XML).unwrap();
        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].title, "Morning News");

        let empty = decode_programs("<radiko><stations></stations></radiko>").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_decode_radio_stations() {
        let stations = decode_radio_stations(STATION_LIST_XML).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, "TBS");
        assert_eq!(stations[0].ascii_name.as_deref(), Some("TBS RADIO"));
        assert_eq!(stations[0].href.as_deref(), Some("https://www.tbsradio.jp/"));
        assert_eq!(stations[1].name, "Nippon Cultural Broadcasting");
        assert_eq!(stations[1].banner, None);
    }

    #[test]
    fn test_decode_truncated_document() {
        let result = decode_stations("<radiko><stations><station id=\"TBS\"><name>TBS");
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_decode_program_without_start() {
        let xml = r#"<radiko><stations><station id="TBS"><progs>
            <prog to="20240101060000"><title>No start</title></prog>
        </progs></station></stations></radiko>"#;
        let err = decode_stations(xml).unwrap_err();
        assert!(err.is_decode_error());
    }
}
