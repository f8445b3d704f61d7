//! Data models for radiko API responses
//!
//! These structures deserialize directly from the service's XML documents
//! (see [`crate::xml`]) and are plain owned values once returned.

use crate::error::Result;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Station List
// ============================================================================

/// An entry of the per-area station list (`v3/station/list/{area}.xml`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RadioStation {
    /// Station identifier (e.g., "TBS", "JOAK")
    pub id: String,
    /// Display name
    pub name: String,
    /// Romanized name, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascii_name: Option<String>,
    /// Station home page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Banner URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

// ============================================================================
// Program Listings
// ============================================================================

/// A station with its program listings
///
/// Date and now-playing queries carry a single `<progs>` block per station;
/// the weekly listing carries one block per day. Older now-playing documents
/// wrap their blocks in `<scd>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Station {
    /// Station identifier
    #[serde(rename = "@id")]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Listings wrapped in `<scd>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scd: Option<Scd>,
    /// Program listings, one per date
    #[serde(rename = "progs", default)]
    pub listings: Vec<ProgramListing>,
}

impl Station {
    /// All programs in listed order, `<scd>` listings first
    pub fn programs(&self) -> impl Iterator<Item = &Program> + '_ {
        self.scd
            .iter()
            .flat_map(|scd| scd.listings.iter())
            .chain(self.listings.iter())
            .flat_map(|l| l.programs.iter())
    }
}

/// Schedule wrapper (`<scd>`) of the v2 now-playing document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scd {
    #[serde(rename = "progs", default)]
    pub listings: Vec<ProgramListing>,
}

/// Date-scoped sequence of programs (`<progs>`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgramListing {
    /// Listing date (`YYYYMMDD`)
    #[serde(default)]
    pub date: String,
    /// Programs in broadcast order
    #[serde(rename = "prog", default)]
    pub programs: Vec<Program>,
}

/// A single broadcast program (`<prog>`)
///
/// `ft` and `to` are kept exactly as the service sent them: the exact-start
/// lookup compares these strings verbatim, and numeric access goes through
/// [`Program::start`] / [`Program::end`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Program {
    /// Program identifier
    #[serde(rename = "@id", default)]
    pub id: String,
    /// Identifier shared by all airings of a series
    #[serde(rename = "@master_id", default)]
    pub master_id: String,
    /// Start (`YYYYMMDDHHmmss`, JST), inclusive
    #[serde(rename = "@ft")]
    pub ft: String,
    /// End (`YYYYMMDDHHmmss`, JST), exclusive
    #[serde(rename = "@to")]
    pub to: String,
    /// Start label (`HHmm`, may exceed 2400 for the small hours)
    #[serde(rename = "@ftl", default)]
    pub ftl: String,
    /// End label (`HHmm`)
    #[serde(rename = "@tol", default)]
    pub tol: String,
    /// Duration in seconds
    #[serde(rename = "@dur", default)]
    pub dur: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sub_title: String,
    #[serde(default)]
    pub desc: String,
    /// Performers
    #[serde(default)]
    pub pfm: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub img: String,
}

impl Program {
    /// Numeric start marker
    pub fn start(&self) -> Result<Timestamp> {
        Timestamp::parse(&self.ft)
    }

    /// Numeric end marker
    pub fn end(&self) -> Result<Timestamp> {
        Timestamp::parse(&self.to)
    }

    /// Whether `at` falls in this program's `[ft, to)` interval
    ///
    /// Fails if either marker is not a number.
    pub fn covers(&self, at: Timestamp) -> Result<bool> {
        Ok(at.within(self.start()?, self.end()?))
    }

    /// Advertised duration
    pub fn duration(&self) -> Option<Duration> {
        self.dur.map(Duration::from_secs)
    }
}

// ============================================================================
// Schedule Snapshot
// ============================================================================

/// The stations returned by one listing request
///
/// A snapshot is never refreshed in place; each request yields a new one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    pub stations: Vec<Station>,
}

impl Schedule {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// First station with the given identifier
    pub fn station(&self, station_id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == station_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn as_slice(&self) -> &[Station] {
        &self.stations
    }
}

impl IntoIterator for Schedule {
    type Item = Station;
    type IntoIter = std::vec::IntoIter<Station>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Station;
    type IntoIter = std::slice::Iter<'a, Station>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}
