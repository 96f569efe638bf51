//! Raw HTTP responses and their captured snapshots.

use std::collections::BTreeMap;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use crate::evidence::Evidence;

/// Best-effort interpretation of a response body.
///
/// A body that is missing or not valid JSON is [`ResponseBody::Empty`]; it is
/// never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    /// Body parsed as JSON.
    Json(Value),
    /// No body, or a body that is not JSON.
    Empty,
}

impl ResponseBody {
    /// Parses `text`, falling back to [`ResponseBody::Empty`].
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::Empty;
        }
        serde_json::from_str(text).map_or(Self::Empty, Self::Json)
    }

    /// Parsed JSON, if any.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Empty => None,
        }
    }

    /// Returns true when the body was missing or not JSON.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[derive(Debug)]
enum BodyState {
    Pending(reqwest::Response),
    Reading,
    Loaded(String),
    Failed(ApiError),
}

/// A response as returned by the pet store, body not yet read.
///
/// Status, headers, method and URL are available immediately; the body is
/// read on first access and cached.
#[derive(Debug)]
pub struct ApiResponse {
    method: Method,
    url: String,
    status: u16,
    headers: BTreeMap<String, String>,
    body: BodyState,
}

impl ApiResponse {
    pub(crate) fn new(method: Method, url: String, response: reqwest::Response) -> Self {
        Self {
            method,
            url,
            status: response.status().as_u16(),
            headers: flatten_headers(response.headers()),
            body: BodyState::Pending(response),
        }
    }

    /// Builds a response from an in-memory HTTP response.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn from_parts(method: Method, url: impl Into<String>, response: http::Response<String>) -> Self {
        Self::new(method, url.into(), reqwest::Response::from(response))
    }

    /// HTTP method of the request.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Numeric status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers, lowercase names, repeated values joined by `, `.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Body as text, reading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Body`] or [`ApiError::Timeout`] when the body
    /// cannot be read. A failed read is remembered and reported again.
    pub async fn text(&mut self) -> Result<&str, ApiError> {
        self.load().await?;
        match &self.body {
            BodyState::Loaded(text) => Ok(text.as_str()),
            BodyState::Failed(error) => Err(error.clone()),
            BodyState::Pending(_) | BodyState::Reading => Err(ApiError::Body {
                url: self.url.clone(),
                message: "body read did not complete".to_owned(),
            }),
        }
    }

    /// Decodes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body is not valid JSON for `T`,
    /// or the errors of [`ApiResponse::text`].
    pub async fn json<T>(&mut self) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url.clone();
        let text = self.text().await?;
        serde_json::from_str(text).map_err(|error| ApiError::Decode {
            url,
            message: error.to_string(),
        })
    }

    /// Best-effort parsed body.
    ///
    /// # Errors
    ///
    /// Only fails when the body cannot be read at all.
    pub async fn body(&mut self) -> Result<ResponseBody, ApiError> {
        Ok(ResponseBody::parse(self.text().await?))
    }

    /// Reads the body and freezes the response into a snapshot.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ApiResponse::text`].
    pub async fn capture(mut self) -> Result<CapturedResponse, ApiError> {
        self.load().await?;
        let text = match self.body {
            BodyState::Loaded(text) => text,
            BodyState::Failed(error) => return Err(error),
            BodyState::Pending(_) | BodyState::Reading => String::new(),
        };
        Ok(CapturedResponse::new(
            self.method.as_str(),
            self.url,
            self.status,
            self.headers,
            text,
        ))
    }

    async fn load(&mut self) -> Result<(), ApiError> {
        match std::mem::replace(&mut self.body, BodyState::Reading) {
            BodyState::Pending(response) => match response.text().await {
                Ok(text) => {
                    self.body = BodyState::Loaded(text);
                    Ok(())
                }
                Err(error) => {
                    let api_error = ApiError::from_body(&self.url, &error);
                    self.body = BodyState::Failed(api_error.clone());
                    Err(api_error)
                }
            },
            BodyState::Failed(error) => {
                self.body = BodyState::Failed(error.clone());
                Err(error)
            }
            settled => {
                self.body = settled;
                Ok(())
            }
        }
    }
}

/// Immutable snapshot of a response whose body has been read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedResponse {
    method: String,
    url: String,
    status: u16,
    headers: BTreeMap<String, String>,
    text: String,
    body: ResponseBody,
}

impl CapturedResponse {
    /// Assembles a snapshot and parses the body best-effort.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        status: u16,
        headers: BTreeMap<String, String>,
        text: impl Into<String>,
    ) -> Self {
        let body_text = text.into();
        let body = ResponseBody::parse(&body_text);
        Self {
            method: method.into(),
            url: url.into(),
            status,
            headers,
            text: body_text,
            body,
        }
    }

    /// HTTP method of the request.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Absolute request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Numeric status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Raw body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Best-effort parsed body.
    #[must_use]
    pub const fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Decodes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body does not match `T`.
    pub fn json<T>(&self) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.text).map_err(|error| ApiError::Decode {
            url: self.url.clone(),
            message: error.to_string(),
        })
    }

    /// Report attachment describing this response.
    #[must_use]
    pub fn to_evidence(&self, label: impl Into<String>) -> Evidence {
        Evidence {
            label: label.into(),
            method: self.method.clone(),
            url: self.url.clone(),
            status: self.status,
            headers: self.headers.clone(),
            body: self.text.clone(),
        }
    }
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flattened: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let text = String::from_utf8_lossy(value.as_bytes()).into_owned();
        flattened
            .entry(name.as_str().to_owned())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&text);
            })
            .or_insert_with(|| text.clone());
    }
    flattened
}
