//! Per-test HTTP context.
//!
//! A context owns one `reqwest::Client` configured with the base URL, the
//! JSON default headers and the request timeout. Each test opens its own
//! context and disposes it when the test ends, so no connection pool is
//! shared between concurrently running tests.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use url::Url;

use super::error::ApiError;
use super::response::ApiResponse;

/// Base URL of the public pet-store demo service.
pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

const JSON_MEDIA_TYPE: &str = "application/json";

/// Settings used to open an [`HttpContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSettings {
    base_url: Url,
    timeout: Duration,
    headers: Vec<(String, String)>,
}

impl ContextSettings {
    /// Parses `base_url` and pairs it with the JSON default headers.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] when `base_url` is not an
    /// absolute URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)
            .map_err(|error| ApiError::InvalidBaseUrl(format!("{base_url}: {error}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(format!(
                "{base_url}: not a hierarchical URL"
            )));
        }

        Ok(Self {
            base_url: parsed,
            timeout,
            headers: vec![
                (CONTENT_TYPE.as_str().to_owned(), JSON_MEDIA_TYPE.to_owned()),
                (ACCEPT.as_str().to_owned(), JSON_MEDIA_TYPE.to_owned()),
            ],
        })
    }

    /// Adds (or replaces) one default header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let header_name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&header_name));
        self.headers.push((header_name, value.into()));
        self
    }

    /// Base URL, including any version prefix such as `/v2`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Timeout applied to every request.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Default headers sent with every request.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Open HTTP session against the pet store.
#[derive(Debug)]
pub struct HttpContext {
    client: Client,
    base: String,
    timeout: Duration,
}

impl HttpContext {
    /// Builds a dedicated client for one test.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidHeader`] when a default header cannot be
    /// encoded, or [`ApiError::Client`] when the client cannot be built.
    pub fn open(settings: &ContextSettings) -> Result<Self, ApiError> {
        let headers = default_headers(settings.headers())?;
        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()
            .map_err(|error| ApiError::Client {
                message: error.to_string(),
            })?;
        let base = settings.base_url().as_str().trim_end_matches('/').to_owned();

        tracing::debug!(base_url = %base, timeout = ?settings.timeout(), "opened HTTP context");
        Ok(Self {
            client,
            base,
            timeout: settings.timeout(),
        })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Request timeout in effect.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for `path`, keeping the base URL's path prefix.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Sends a request without a body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Timeout`] or [`ApiError::Network`] when the
    /// request does not produce a response. Non-2xx statuses are returned as
    /// ordinary responses.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(path);
        let mut builder = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        execute(method, url, builder).await
    }

    /// Sends a request with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`HttpContext::send`].
    pub async fn send_json<T>(
        &self,
        method: Method,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let url = self.url(path);
        let builder = self.client.request(method.clone(), &url).json(body);
        execute(method, url, builder).await
    }

    /// Releases the client and its connection pool.
    pub fn dispose(self) {
        tracing::debug!(base_url = %self.base, "disposed HTTP context");
        drop(self.client);
    }
}

async fn execute(
    method: Method,
    url: String,
    builder: RequestBuilder,
) -> Result<ApiResponse, ApiError> {
    tracing::debug!(%method, %url, "sending request");
    let response = builder
        .send()
        .await
        .map_err(|error| ApiError::from_send(&url, &error))?;
    tracing::debug!(%method, %url, status = response.status().as_u16(), "received response");
    Ok(ApiResponse::new(method, url, response))
}

fn default_headers(pairs: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|error| ApiError::InvalidHeader {
                name: name.clone(),
                message: error.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|error| ApiError::InvalidHeader {
            name: name.clone(),
            message: error.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}
