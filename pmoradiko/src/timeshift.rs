//! Time-shift playlist resolution
//!
//! Resolving a past broadcast is a chain of two exchanges: the day's
//! listing locates the program starting at the requested instant, then the
//! playlist endpoint is asked for that program's `[ft, to)` window and the
//! media URI is read out of the returned M3U8.

use crate::api::{api_path, API_V2};
use crate::client::RadikoClient;
use crate::error::Result;
use crate::m3u8;
use chrono::{DateTime, TimeZone};
use reqwest::Method;
use tracing::{debug, info};

/// Value of the `l` (listing length) playlist parameter
pub const PLAYLIST_LISTING_LENGTH: &str = "15";

impl RadikoClient {
    /// URI of the time-shift media for the program starting at `start`
    ///
    /// The client must hold a session token (see [`RadikoClient::authorize`]
    /// or [`crate::ClientBuilder::auth_token`]).
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - empty station id, nothing is fetched
    /// * `Error::ProgramNotFound` - no program starts exactly at `start`
    /// * `Error::Unauthorized` - no token, or the token was rejected
    /// * `Error::Playlist` - the playlist body names no media URI
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use pmoradiko::RadikoClient;
    /// # use pmoradiko::timestamp::jst;
    /// # use chrono::TimeZone;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut client = RadikoClient::new().await?;
    /// client.authorize().await?;
    ///
    /// let start = jst().with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();
    /// let uri = client.timeshift_playlist_m3u8("TBS", &start).await?;
    /// println!("{}", uri);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn timeshift_playlist_m3u8<Tz: TimeZone>(
        &self,
        station_id: &str,
        start: &DateTime<Tz>,
    ) -> Result<String> {
        let program = self.get_program_by_start_time(station_id, start).await?;
        info!(
            "Requesting time-shift playlist for {} [{}, {})",
            station_id, program.ft, program.to
        );

        let path = api_path(API_V2, "ts/playlist.m3u8");
        let query = [
            ("station_id", station_id),
            ("ft", program.ft.as_str()),
            ("to", program.to.as_str()),
            ("l", PLAYLIST_LISTING_LENGTH),
        ];
        let body = self
            .api()
            .execute_authenticated(Method::POST, &path, &query)
            .await?;
        debug!("Playlist body: {} bytes", body.len());

        m3u8::uri_from_m3u8(body.as_bytes())
    }
}
