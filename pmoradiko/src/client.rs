//! HTTP client for the radiko API
//!
//! This module provides the high-level client: program listings, station
//! lists, program lookups and session authorization. Time-shift playlist
//! resolution lives in [`crate::timeshift`].
//!
//! # Example
//!
//! ```no_run
//! use pmoradiko::RadikoClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RadikoClient::new().await?;
//!
//!     let now = client.get_now_programs().await?;
//!     for station in &now {
//!         if let Some(program) = station.programs().next() {
//!             println!("{}: {}", station.name, program.title);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use crate::api::auth::AuthInfo;
use crate::api::{api_path, RadikoApi, API_V2, API_V3, DEFAULT_AREA_ID, DEFAULT_BASE_URL};
use crate::config::RadikoConfig;
use crate::error::{Error, Result};
use crate::locator;
use crate::models::{Program, RadioStation, Schedule};
use crate::timestamp::broadcast_date;
use crate::xml;
use chrono::{DateTime, TimeZone};
use reqwest::{Client, Method};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "PMOMusic/0.3.10 (pmoradiko)";

/// radiko HTTP client
///
/// Read operations take `&self` and keep no per-call state, so a client can
/// be cloned or shared between tasks. Every listing call fetches a fresh
/// snapshot; nothing is cached.
#[derive(Debug, Clone)]
pub struct RadikoClient {
    api: RadikoApi,
}

impl RadikoClient {
    /// Create a new client with default settings
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a loaded configuration
    pub async fn from_config(config: &RadikoConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build().await
    }

    /// Create a client with a custom reqwest::Client
    ///
    /// Useful for sharing HTTP connection pools or custom proxy settings
    pub fn with_client(client: Client) -> Self {
        Self {
            api: RadikoApi::new(
                client,
                DEFAULT_BASE_URL,
                Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
                DEFAULT_AREA_ID,
            ),
        }
    }

    /// Low-level API access
    pub fn api(&self) -> &RadikoApi {
        &self.api
    }

    pub fn base_url(&self) -> &str {
        self.api.base_url()
    }

    pub fn area_id(&self) -> &str {
        self.api.area_id()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.api.auth_token()
    }

    /// A handle whose requests abort with [`Error::Cancelled`] once `token`
    /// is cancelled
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        let mut api = self.api.clone();
        api.set_cancellation_token(token);
        Self { api }
    }

    /// Authorize the session and remember token and area
    pub async fn authorize(&mut self) -> Result<AuthInfo> {
        self.api.authorize().await
    }

    // ========================================================================
    // Station List
    // ========================================================================

    /// Stations broadcasting in the client's area
    pub async fn get_radio_stations(&self) -> Result<Vec<RadioStation>> {
        let path = format!("{}/station/list/{}.xml", API_V3, self.area_id());
        let body = self.api.execute(Method::GET, &path, &[]).await?;
        xml::decode_radio_stations(&body)
    }

    // ========================================================================
    // Program Listings
    // ========================================================================

    /// All stations of the client's area with their programs for the
    /// broadcast day containing `date`
    pub async fn get_stations<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> Result<Schedule> {
        let path = format!(
            "{}/program/date/{}/{}.xml",
            API_V3,
            broadcast_date(date),
            self.area_id()
        );
        let body = self.api.execute(Method::GET, &path, &[]).await?;
        xml::decode_stations(&body)
    }

    /// Programs currently on air in the client's area
    pub async fn get_now_programs(&self) -> Result<Schedule> {
        let path = api_path(API_V2, "program/now");
        let body = self
            .api
            .execute(Method::GET, &path, &[("area_id", self.area_id())])
            .await?;
        xml::decode_stations(&body)
    }

    /// One week of programs for a station
    pub async fn get_weekly_programs(&self, station_id: &str) -> Result<Schedule> {
        validate_station_id(station_id)?;

        let path = format!("{}/program/station/weekly/{}.xml", API_V3, station_id);
        let body = self.api.execute(Method::GET, &path, &[]).await?;
        xml::decode_stations(&body)
    }

    /// Programs of one station for the broadcast day containing `date`
    pub async fn get_programs_by_station<Tz: TimeZone>(
        &self,
        station_id: &str,
        date: &DateTime<Tz>,
    ) -> Result<Vec<Program>> {
        validate_station_id(station_id)?;

        let path = format!(
            "{}/program/station/date/{}/{}.xml",
            API_V3,
            broadcast_date(date),
            station_id
        );
        let body = self.api.execute(Method::GET, &path, &[]).await?;
        xml::decode_programs(&body)
    }

    // ========================================================================
    // Program Lookup
    // ========================================================================

    /// The program of `station_id` on air at `at`
    ///
    /// # Errors
    ///
    /// * `Error::ProgramNotFound` - no program of the day covers `at`
    /// * `Error::MalformedTimestamp` - a listed program has a non-numeric
    ///   boundary
    pub async fn find_program_by_station<Tz: TimeZone>(
        &self,
        station_id: &str,
        at: &DateTime<Tz>,
    ) -> Result<Program> {
        let programs = self.get_programs_by_station(station_id, at).await?;
        let program = locator::find_program_covering_instant(&programs, at).inspect_err(|e| {
            if e.is_not_found() {
                warn!("No program of {} on air at {}", station_id, at.naive_utc());
            }
        })?;
        Ok(program.clone())
    }

    /// The program of `station_id` starting exactly at `start`
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - empty station id, nothing is fetched
    /// * `Error::ProgramNotFound` - no program starts at `start`
    pub async fn get_program_by_start_time<Tz: TimeZone>(
        &self,
        station_id: &str,
        start: &DateTime<Tz>,
    ) -> Result<Program> {
        validate_station_id(station_id)?;

        let schedule = self.get_stations(start).await?;
        let program = locator::find_program_starting_at(schedule.as_slice(), station_id, start)
            .inspect_err(|e| {
                if e.is_not_found() {
                    warn!(
                        "No program of {} starts at {}",
                        station_id,
                        start.naive_utc()
                    );
                }
            })?;

        debug!("Found program '{}' [{}, {})", program.title, program.ft, program.to);
        Ok(program.clone())
    }
}

/// Reject empty station identifiers before any request is made
fn validate_station_id(station_id: &str) -> Result<()> {
    if station_id.trim().is_empty() {
        return Err(Error::invalid_parameter("station id is empty"));
    }
    Ok(())
}

/// Builder for configuring a RadikoClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    area_id: String,
    timeout: Duration,
    user_agent: String,
    proxy: Option<String>,
    auth_token: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            area_id: DEFAULT_AREA_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            auth_token: None,
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a loaded configuration
    pub fn from_config(config: &RadikoConfig) -> Self {
        Self {
            client: None,
            base_url: config.base_url.clone(),
            area_id: config.area_id.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            proxy: config.proxy.clone(),
            auth_token: config.auth_token.clone(),
        }
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the area used by area-scoped listings
    pub fn area_id(mut self, area_id: impl Into<String>) -> Self {
        self.area_id = area_id.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Use an already issued session token instead of calling `authorize`
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Build the client
    pub async fn build(self) -> Result<RadikoClient> {
        if self.area_id.trim().is_empty() {
            return Err(Error::Config("area id is empty".to_string()));
        }

        let client = if let Some(client) = self.client {
            client
        } else {
            let mut builder = Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout);

            if let Some(proxy_url) = &self.proxy {
                let proxy = reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy: {}", e)))?;
                builder = builder.proxy(proxy);
            }

            builder.build()?
        };

        let mut api = RadikoApi::new(client, self.base_url, self.timeout, self.area_id);
        if let Some(token) = self.auth_token {
            api.set_auth_token(token);
        }

        Ok(RadikoClient { api })
    }
}
