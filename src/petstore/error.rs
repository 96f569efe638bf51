//! Error types exposed by the pet-store transport layer.

use thiserror::Error;

/// Errors surfaced while building requests or talking to the pet store.
///
/// Non-2xx responses are not errors: they come back as ordinary responses.
/// Only failures to reach the service or to read what it sent end up here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The configured base URL could not be parsed.
    #[error("base URL is invalid: {0}")]
    InvalidBaseUrl(String),

    /// A default header could not be encoded.
    #[error("invalid default header `{name}`: {message}")]
    InvalidHeader {
        /// Header name as configured.
        name: String,
        /// Encoding failure detail.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to configure HTTP client: {message}")]
    Client {
        /// Builder failure detail.
        message: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out: {message}")]
    Timeout {
        /// Target URL of the request.
        url: String,
        /// Transport-level error detail.
        message: String,
    },

    /// Networking failed while calling the service.
    #[error("network error talking to {url}: {message}")]
    Network {
        /// Target URL of the request.
        url: String,
        /// Transport-level error detail.
        message: String,
    },

    /// The response body could not be read.
    #[error("failed to read response body from {url}: {message}")]
    Body {
        /// URL the response came from.
        url: String,
        /// Read failure detail.
        message: String,
    },

    /// The response body was not the JSON shape the caller asked for.
    #[error("response from {url} could not be decoded: {message}")]
    Decode {
        /// URL the response came from.
        url: String,
        /// Deserialisation failure detail.
        message: String,
    },
}

impl ApiError {
    /// Maps a `reqwest` send failure, keeping timeouts distinguishable.
    pub(crate) fn from_send(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_owned(),
                message: error.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_owned(),
                message: error.to_string(),
            }
        }
    }

    /// Maps a failure while reading a response body.
    pub(crate) fn from_body(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_owned(),
                message: error.to_string(),
            }
        } else {
            Self::Body {
                url: url.to_owned(),
                message: error.to_string(),
            }
        }
    }

    /// Returns true when the failure was a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
