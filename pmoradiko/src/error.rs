//! Error types for the radiko client

use std::num::ParseIntError;

/// Result type alias for radiko operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using the radiko client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller-supplied parameter was rejected before any request was sent
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Missing or rejected authorization token
    #[error("Authorization failed: {0}")]
    Unauthorized(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The caller's cancellation token fired while a request was in flight
    #[error("Request cancelled")]
    Cancelled,

    /// XML decoding failed
    #[error("XML decoding failed: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// The playlist body could not be parsed or carried no media URI
    #[error("Playlist parsing failed: {0}")]
    Playlist(String),

    /// No program matches the requested station and time
    #[error("Program not found")]
    ProgramNotFound,

    /// A program timestamp or lookup target is not a number
    #[error("Malformed timestamp {value:?}: {source}")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing failed
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a parameter error
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a playlist parsing error
    pub fn playlist(msg: impl Into<String>) -> Self {
        Self::Playlist(msg.into())
    }

    /// Build an error from a non-success HTTP status and its body
    pub fn from_status_code(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message.into()),
            _ => Self::Api {
                status,
                message: message.into(),
            },
        }
    }

    /// True for the "program not found" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ProgramNotFound)
    }

    /// True when a response body could not be decoded
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Error::Xml(_) | Error::Playlist(_))
    }

    /// True for failures of the HTTP exchange itself
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::Api { .. }
                | Error::Unauthorized(_)
                | Error::InvalidUrl(_)
                | Error::Cancelled
        )
    }
}
