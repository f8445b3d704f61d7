//! radiko client library for PMOMusic
//!
//! This crate provides a Rust client for the radiko program metadata API and
//! its time-shift playlists.
//!
//! # Features
//!
//! - **Program Listings**: By date, currently on air, weekly, per station
//! - **Station List**: Stations broadcasting in an area
//! - **Program Lookup**: The program starting exactly at an instant, or the
//!   one on air at an arbitrary instant
//! - **Time-shift Playlists**: Resolve the media URI of a past program
//! - **Authorization**: The auth1/auth2 token handshake
//!
//! # Example
//!
//! ```no_run
//! use chrono::TimeZone;
//! use pmoradiko::{timestamp::jst, RadikoClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = RadikoClient::new().await?;
//!     client.authorize().await?;
//!
//!     // What was on TBS at 07:15?
//!     let at = jst().with_ymd_and_hms(2024, 1, 1, 7, 15, 0).unwrap();
//!     let program = client.find_program_by_station("TBS", &at).await?;
//!     println!("{} ({} - {})", program.title, program.ftl, program.tol);
//!
//!     // Playlist of that program, from its official start
//!     let start = program.start()?.to_datetime().expect("listed start is a date");
//!     let uri = client.timeshift_playlist_m3u8("TBS", &start).await?;
//!     println!("Playlist: {}", uri);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Lookups
//!
//! The lookup functions in [`locator`] are pure and can be used on any
//! [`Schedule`] or program slice:
//!
//! ```
//! use pmoradiko::locator::find_program_covering;
//! use pmoradiko::Program;
//!
//! let programs = vec![
//!     Program { ft: "100".into(), to: "200".into(), ..Default::default() },
//!     Program { ft: "200".into(), to: "300".into(), ..Default::default() },
//! ];
//! assert_eq!(find_program_covering(&programs, "200").unwrap().ft, "200");
//! assert!(find_program_covering(&programs, "300").unwrap_err().is_not_found());
//! ```
//!
//! # Cancellation
//!
//! [`RadikoClient::with_cancellation`] binds a client handle to a
//! `tokio_util::sync::CancellationToken`; cancelling it aborts the request
//! in flight and the call returns [`Error::Cancelled`].
//!
//! # Logging
//!
//! The crate logs through `tracing` and never installs a subscriber.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod locator;
pub mod m3u8;
pub mod models;
pub mod timeshift;
pub mod timestamp;
pub mod xml;

// Re-exports
pub use api::auth::AuthInfo;
pub use api::RadikoApi;
pub use client::{ClientBuilder, RadikoClient};
pub use config::RadikoConfig;
pub use error::{Error, Result};
pub use locator::{find_program_covering, find_program_covering_instant, find_program_starting_at};
pub use models::{Program, ProgramListing, RadioStation, Schedule, Scd, Station};
pub use timestamp::Timestamp;
