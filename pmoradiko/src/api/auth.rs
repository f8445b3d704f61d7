//! Token authorization for the radiko API
//!
//! The handshake has two legs:
//!
//! 1. `auth1` hands out a token plus an offset/length into the player key.
//! 2. `auth2` validates the token with the base64 of that key slice and
//!    answers with the caller's area (`JP13,東京都,tokyo Japan`).

use super::{api_path, RadikoApi, API_V2, AUTH_TOKEN_HEADER};
use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Key embedded in the public HTML5 player
pub const PLAYER_AUTH_KEY: &str = "bcd151073c03b352e1ef2fd66c32209da9ca0afa";

const APP_HEADER: &str = "X-Radiko-App";
const APP_VERSION_HEADER: &str = "X-Radiko-App-Version";
const USER_HEADER: &str = "X-Radiko-User";
const DEVICE_HEADER: &str = "X-Radiko-Device";
const KEY_OFFSET_HEADER: &str = "X-Radiko-KeyOffset";
const KEY_LENGTH_HEADER: &str = "X-Radiko-KeyLength";
const PARTIAL_KEY_HEADER: &str = "X-Radiko-PartialKey";

const APP: &str = "pc_html5";
const APP_VERSION: &str = "0.0.1";
const USER: &str = "dummy_user";
const DEVICE: &str = "pc";

/// Result of a successful authorization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthInfo {
    /// Session token
    pub token: String,
    /// Area the service located the caller in
    pub area_id: String,
}

impl RadikoApi {
    /// Run the auth1/auth2 handshake
    ///
    /// On success the token and the detected area id are stored on the
    /// client and used by subsequent requests.
    ///
    /// # Errors
    ///
    /// * `Error::Unauthorized` - missing headers, bad key slice or a rejected
    ///   token
    pub async fn authorize(&mut self) -> Result<AuthInfo> {
        info!("Authorizing radiko session");

        let auth1 = self
            .request(Method::GET, &api_path(API_V2, "auth1"), &[])?
            .header(APP_HEADER, APP)
            .header(APP_VERSION_HEADER, APP_VERSION)
            .header(USER_HEADER, USER)
            .header(DEVICE_HEADER, DEVICE);
        let (headers, _) = self.exchange(auth1).await?;

        let token = required_header(&headers, AUTH_TOKEN_HEADER)?.to_string();
        let offset = numeric_header(&headers, KEY_OFFSET_HEADER)?;
        let length = numeric_header(&headers, KEY_LENGTH_HEADER)?;
        let partial_key = partial_key(PLAYER_AUTH_KEY, offset, length)?;
        debug!("auth1 ok, key slice {}+{}", offset, length);

        let auth2 = self
            .request(Method::GET, &api_path(API_V2, "auth2"), &[])?
            .header(AUTH_TOKEN_HEADER, &token)
            .header(PARTIAL_KEY_HEADER, &partial_key)
            .header(USER_HEADER, USER)
            .header(DEVICE_HEADER, DEVICE);
        let (_, body) = self.exchange(auth2).await?;

        let area_id = parse_area_id(&body)?;
        info!("Authorized for area {}", area_id);

        self.set_auth_token(token.clone());
        self.set_area_id(area_id.clone());

        Ok(AuthInfo { token, area_id })
    }

    /// Whether a session token is held
    pub fn is_authorized(&self) -> bool {
        self.auth_token().is_some()
    }
}

/// Base64 of `key[offset..offset + length]`
pub fn partial_key(key: &str, offset: usize, length: usize) -> Result<String> {
    let slice = offset
        .checked_add(length)
        .and_then(|end| key.as_bytes().get(offset..end))
        .ok_or_else(|| {
            Error::Unauthorized(format!(
                "key slice {}+{} exceeds the {}-byte player key",
                offset,
                length,
                key.len()
            ))
        })?;
    Ok(STANDARD.encode(slice))
}

/// Area id from an auth2 body (first comma-separated field)
pub fn parse_area_id(body: &str) -> Result<String> {
    body.trim()
        .split(',')
        .next()
        .map(str::trim)
        .filter(|area| !area.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::Unauthorized("auth2 response carries no area id".to_string()))
}

fn required_header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Unauthorized(format!("auth1 response lacks {}", name)))
}

fn numeric_header(headers: &HeaderMap, name: &str) -> Result<usize> {
    let value = required_header(headers, name)?;
    value
        .trim()
        .parse()
        .map_err(|_| Error::Unauthorized(format!("{} is not a number: {:?}", name, value)))
}
