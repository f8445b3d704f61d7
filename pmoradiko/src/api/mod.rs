//! Low-level access to the radiko HTTP API
//!
//! [`RadikoApi`] owns the HTTP client and the session (area id, auth token)
//! and turns `(method, path, query)` triples into response bodies. Bodies
//! are read completely before a call returns, so no connection outlives it.

pub mod auth;

use crate::error::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// Default radiko base URL
pub const DEFAULT_BASE_URL: &str = "https://radiko.jp";

/// Path prefix of the v2 API
pub const API_V2: &str = "v2";

/// Path prefix of the v3 API
pub const API_V3: &str = "v3";

/// Header carrying the session token
pub const AUTH_TOKEN_HEADER: &str = "X-Radiko-AuthToken";

/// Default area (Tokyo)
pub const DEFAULT_AREA_ID: &str = "JP13";

/// Build a path under a versioned `api/` prefix, e.g. `v2/api/program/now`
pub fn api_path(version: &str, path: &str) -> String {
    format!("{}/api/{}", version, path.trim_start_matches('/'))
}

/// Low-level API client for radiko
#[derive(Debug, Clone)]
pub struct RadikoApi {
    client: Client,
    base_url: String,
    timeout: Duration,
    area_id: String,
    auth_token: Option<String>,
    cancel: CancellationToken,
}

impl RadikoApi {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        timeout: Duration,
        area_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
            area_id: area_id.into(),
            auth_token: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn area_id(&self) -> &str {
        &self.area_id
    }

    pub fn set_area_id(&mut self, area_id: impl Into<String>) {
        self.area_id = area_id.into();
    }

    /// Session token, if authorized
    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    pub fn clear_auth_token(&mut self) {
        self.auth_token = None;
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Bind requests to a caller-supplied cancellation token
    pub fn set_cancellation_token(&mut self, token: CancellationToken) {
        self.cancel = token;
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))?)
    }

    /// Execute a request and return its body
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String> {
        let request = self.request(method, path, query)?;
        let (_, body) = self.exchange(request).await?;
        Ok(body)
    }

    /// Execute a request carrying the session token header
    ///
    /// Fails with [`Error::Unauthorized`] without sending anything when the
    /// client holds no token.
    pub async fn execute_authenticated(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String> {
        let token = self.auth_token.as_deref().ok_or_else(|| {
            Error::Unauthorized("no auth token, authorize the client first".to_string())
        })?;

        let request = self
            .request(method, path, query)?
            .header(AUTH_TOKEN_HEADER, token);
        let (_, body) = self.exchange(request).await?;
        Ok(body)
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        debug!("{} {} with {} params", method, url, query.len());

        Ok(self
            .client
            .request(method, url)
            .query(query)
            .timeout(self.timeout))
    }

    /// Send a request and read the whole response
    ///
    /// Both the send and the body read race the cancellation token; a
    /// cancelled exchange drops the in-flight future.
    pub(crate) async fn exchange(&self, request: RequestBuilder) -> Result<(HeaderMap, String)> {
        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            response = request.send() => response?,
        };

        let status = response.status();
        let headers = response.headers().clone();
        debug!("Response status: {}", status);

        let body = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            body = response.text() => body?,
        };

        if !status.is_success() {
            warn!("API error ({}): {}", status.as_u16(), body);
            return Err(Error::from_status_code(status.as_u16(), body));
        }

        Ok((headers, body))
    }
}
