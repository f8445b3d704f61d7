//! Program lookup by time
//!
//! Two lookups with different contracts:
//!
//! - [`find_program_starting_at`] matches a program whose listed start is
//!   exactly the requested instant. Time-shift requests are always anchored
//!   to an official start, so this is what playlist resolution uses.
//! - [`find_program_covering`] matches the program whose `[ft, to)`
//!   interval contains an arbitrary instant.
//!
//! Both scan in listed order and return the first match, so inconsistent
//! listings (duplicates, overlaps) resolve deterministically.

use crate::error::{Error, Result};
use crate::models::{Program, Station};
use crate::timestamp::{format_datetime, Timestamp};
use chrono::{DateTime, TimeZone};
use tracing::debug;

/// Find the program of `station_id` that starts exactly at `start`
///
/// Only the first station carrying `station_id` is searched. Matching is
/// string equality between the program's `ft` and the 14-digit JST form
/// of `start`.
///
/// # Errors
///
/// [`Error::ProgramNotFound`] if no station matches or none of its programs
/// starts at `start`.
pub fn find_program_starting_at<'a, Tz: TimeZone>(
    stations: &'a [Station],
    station_id: &str,
    start: &DateTime<Tz>,
) -> Result<&'a Program> {
    let ft = format_datetime(start);

    let station = stations
        .iter()
        .find(|s| s.id == station_id)
        .ok_or(Error::ProgramNotFound)?;

    let found = station.programs().find(|p| p.ft == ft);
    debug!(
        "Exact-start lookup {}@{}: {}",
        station_id,
        ft,
        if found.is_some() { "hit" } else { "miss" }
    );
    found.ok_or(Error::ProgramNotFound)
}

/// Find the program whose `[ft, to)` interval contains `target`
///
/// `target` is a pre-formatted numeric timestamp string. Programs are
/// checked in listed order; the first containing one wins.
///
/// # Errors
///
/// - [`Error::MalformedTimestamp`] as soon as `target`, or the `ft`/`to` of
///   a scanned program, is not a number. Malformed entries are never
///   skipped, even when a later entry would match.
/// - [`Error::ProgramNotFound`] if no interval contains `target`.
pub fn find_program_covering<'a>(programs: &'a [Program], target: &str) -> Result<&'a Program> {
    let target = Timestamp::parse(target)?;

    for program in programs {
        if program.covers(target)? {
            return Ok(program);
        }
    }

    debug!("No program covers {}", target);
    Err(Error::ProgramNotFound)
}

/// [`find_program_covering`] for an instant in any time zone
pub fn find_program_covering_instant<'a, Tz: TimeZone>(
    programs: &'a [Program],
    at: &DateTime<Tz>,
) -> Result<&'a Program> {
    find_program_covering(programs, &format_datetime(at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProgramListing;
    use crate::timestamp::jst;

    fn program(ft: &str, to: &str, title: &str) -> Program {
        Program {
            ft: ft.to_string(),
            to: to.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn station(id: &str, programs: Vec<Program>) -> Station {
        Station {
            id: id.to_string(),
            name: id.to_string(),
            scd: None,
            listings: vec![ProgramListing {
                date: "20240101".to_string(),
                programs,
            }],
        }
    }

    // ------------------------------------------------------------------
    // Exact-start lookup
    // ------------------------------------------------------------------

    #[test]
    fn test_exact_start_hit_and_miss() {
        let stations = vec![station(
            "JOAK",
            vec![program("20240101050000", "20240101060000", "News")],
        )];

        let at = jst().with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();
        let found = find_program_starting_at(&stations, "JOAK", &at).unwrap();
        assert_eq!(found.title, "News");

        let off_by_one = jst().with_ymd_and_hms(2024, 1, 1, 5, 0, 1).unwrap();
        assert!(matches!(
            find_program_starting_at(&stations, "JOAK", &off_by_one),
            Err(Error::ProgramNotFound)
        ));
    }

    #[test]
    fn test_exact_start_does_not_use_containment() {
        let stations = vec![station(
            "JOAK",
            vec![program("20240101050000", "20240101060000", "News")],
        )];
        let mid = jst().with_ymd_and_hms(2024, 1, 1, 5, 30, 0).unwrap();
        let err = find_program_starting_at(&stations, "JOAK", &mid).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_exact_start_accepts_other_time_zones() {
        let stations = vec![station(
            "JOAK",
            vec![program("20240101050000", "20240101060000", "News")],
        )];
        let utc = chrono::Utc.with_ymd_and_hms(2023, 12, 31, 20, 0, 0).unwrap();
        assert_eq!(
            find_program_starting_at(&stations, "JOAK", &utc).unwrap().title,
            "News"
        );
    }

    #[test]
    fn test_exact_start_unknown_station() {
        let stations = vec![station(
            "JOAK",
            vec![program("20240101050000", "20240101060000", "News")],
        )];
        let at = jst().with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();
        assert!(find_program_starting_at(&stations, "TBS", &at)
            .unwrap_err()
            .is_not_found());
        assert!(find_program_starting_at(&[], "JOAK", &at)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_exact_start_first_duplicate_wins() {
        let stations = vec![
            station(
                "TBS",
                vec![
                    program("20240101050000", "20240101060000", "First"),
                    program("20240101050000", "20240101053000", "Second"),
                ],
            ),
            station(
                "TBS",
                vec![program("20240101050000", "20240101060000", "Other station")],
            ),
        ];
        let at = jst().with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();
        let found = find_program_starting_at(&stations, "TBS", &at).unwrap();
        assert_eq!(found.title, "First");
    }

    #[test]
    fn test_exact_start_ignores_malformed_neighbours() {
        let stations = vec![station(
            "TBS",
            vec![
                program("garbage", "garbage", "Broken"),
                program("20240101050000", "20240101060000", "News"),
            ],
        )];
        let at = jst().with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();
        assert_eq!(
            find_program_starting_at(&stations, "TBS", &at).unwrap().title,
            "News"
        );
    }

    // ------------------------------------------------------------------
    // Interval-containment lookup
    // ------------------------------------------------------------------

    #[test]
    fn test_covering_half_open_boundaries() {
        let programs = vec![program("100", "200", "A"), program("200", "300", "B")];

        assert_eq!(find_program_covering(&programs, "150").unwrap().title, "A");
        assert_eq!(find_program_covering(&programs, "100").unwrap().title, "A");
        assert_eq!(find_program_covering(&programs, "200").unwrap().title, "B");
        assert!(matches!(
            find_program_covering(&programs, "300"),
            Err(Error::ProgramNotFound)
        ));
        assert!(matches!(
            find_program_covering(&programs, "99"),
            Err(Error::ProgramNotFound)
        ));
    }

    #[test]
    fn test_covering_every_instant_of_a_day() {
        let programs = vec![
            program("20240101050000", "20240101090000", "Morning"),
            program("20240101090000", "20240101130000", "Noon"),
            program("20240101130000", "20240101180000", "Afternoon"),
            program("20240101180000", "20240102050000", "Night"),
        ];

        let mut at = jst().with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();
        let end = jst().with_ymd_and_hms(2024, 1, 2, 5, 0, 0).unwrap();
        while at < end {
            let target = Timestamp::from_datetime(&at);
            let found = find_program_covering_instant(&programs, &at).unwrap();
            let expected: Vec<&Program> = programs
                .iter()
                .filter(|p| p.covers(target).unwrap())
                .collect();
            assert_eq!(expected.len(), 1);
            assert_eq!(found, expected[0]);
            at += chrono::Duration::minutes(7);
        }

        assert!(find_program_covering_instant(&programs, &end)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_covering_overlap_first_listed_wins() {
        let programs = vec![program("100", "300", "Long"), program("150", "200", "Short")];
        assert_eq!(
            find_program_covering(&programs, "160").unwrap().title,
            "Long"
        );
    }

    #[test]
    fn test_covering_malformed_entry_fails_before_later_match() {
        let programs = vec![
            program("100", "oops", "Broken"),
            program("200", "300", "Valid"),
        ];
        match find_program_covering(&programs, "250") {
            Err(Error::MalformedTimestamp { value, .. }) => assert_eq!(value, "oops"),
            other => panic!("expected malformed timestamp, got {other:?}"),
        }

        let bad_start = vec![program("", "200", "Broken"), program("200", "300", "Valid")];
        assert!(matches!(
            find_program_covering(&bad_start, "250"),
            Err(Error::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_covering_malformed_target() {
        let programs = vec![program("100", "200", "A")];
        assert!(matches!(
            find_program_covering(&programs, "1.5e2"),
            Err(Error::MalformedTimestamp { .. })
        ));
    }

    #[test]
    fn test_covering_empty_list() {
        assert!(find_program_covering(&[], "150").unwrap_err().is_not_found());
    }

    #[test]
    fn test_lookups_are_idempotent() {
        let programs = vec![program("100", "200", "A"), program("200", "300", "B")];
        let first = find_program_covering(&programs, "250").unwrap().clone();
        for _ in 0..3 {
            assert_eq!(find_program_covering(&programs, "250").unwrap(), &first);
        }

        let stations = vec![station(
            "JOAK",
            vec![program("20240101050000", "20240101060000", "News")],
        )];
        let at = jst().with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();
        let a = find_program_starting_at(&stations, "JOAK", &at).unwrap();
        let b = find_program_starting_at(&stations, "JOAK", &at).unwrap();
        assert!(std::ptr::eq(a, b));
    }
}
