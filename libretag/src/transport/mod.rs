//! Composable HTTP transports for registry communication.
//!
//! A [`Transport`] sends one request and returns one response. The registry
//! client stacks decorators over the blocking reqwest client:
//!
//! ```text
//! BasicAuthTransport -> BearerRetryTransport -> HttpTransport
//! ```
//!
//! Each layer owns the next one. Decorators never absorb errors from the layer
//! below; they only add headers or replay a request after a bearer challenge.

use crate::auth::Credentials;
use crate::error::{Result, RetagError};
use reqwest::blocking::{Client as ReqwestClient, Request, Response};
use reqwest::{Method, Url};
use std::io;
use std::time::Duration;

pub mod basic;
pub mod bearer;
pub mod token;

pub use basic::BasicAuthTransport;
pub use bearer::BearerRetryTransport;
pub use token::{TokenExchange, TokenOutcome};


/// Something that can carry a request to a registry and bring back a response.
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response, whatever its status.
    ///
    /// Only failures to send or receive are errors; a 4xx or 5xx status is a
    /// successful round trip.
    fn round_trip(&self, request: Request) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn round_trip(&self, request: Request) -> Result<Response> {
        (**self).round_trip(request)
    }
}

/// Configuration for the base HTTP client.
///
/// No timeout is set by default: deadlines are the caller's decision.
///
/// # Examples
///
/// ```
/// use libretag::transport::ClientConfig;
///
/// let config = ClientConfig::new().with_timeout(60);
/// assert_eq!(config.timeout_seconds, Some(60));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: none)
    pub timeout_seconds: Option<u64>,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: format!("retag/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Sets the User-Agent header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Read-only settings shared by every layer of one registry's transport chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    registry_url: String,
    credentials: Credentials,
}

impl TransportConfig {
    /// Creates a transport configuration.
    ///
    /// The registry URL is normalized: a missing scheme becomes `https://` and
    /// trailing slashes are removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::auth::Credentials;
    /// use libretag::transport::TransportConfig;
    ///
    /// let config = TransportConfig::new("https://index.docker.io/", Credentials::Anonymous).unwrap();
    /// assert_eq!(config.registry_url(), "https://index.docker.io");
    /// ```
    pub fn new(registry_url: &str, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            registry_url: normalize_url(registry_url)?,
            credentials,
        })
    }

    /// Returns the normalized registry base URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Returns the configured credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Normalizes a registry URL by ensuring it has a scheme and removing trailing slashes.
fn normalize_url(url: &str) -> Result<String> {
    let url = url.trim();

    if url.is_empty() {
        return Err(RetagError::validation("Registry URL cannot be empty"));
    }

    let url = if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{}", url)
    } else {
        url.to_string()
    };

    // Round-trip through Url so prefix checks see the same spelling as request URLs.
    let parsed = Url::parse(&url).map_err(|e| {
        RetagError::validation_with_source(format!("Invalid registry URL: {}", url), e)
    })?;

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Builds a request for `url`, mapping parse failures to validation errors.
pub(crate) fn new_request(method: Method, url: &str) -> Result<Request> {
    let parsed = Url::parse(url)
        .map_err(|e| RetagError::validation_with_source(format!("Invalid URL: {}", url), e))?;
    Ok(Request::new(method, parsed))
}

/// Reads and discards the rest of a response body so the connection can be reused.
pub(crate) fn discard(mut response: Response) {
    if let Err(e) = io::copy(&mut response, &mut io::sink()) {
        tracing::debug!(url = %response.url(), error = %e, "failed to drain response body");
    }
}

/// The innermost transport: a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
}

impl HttpTransport {
    /// Builds the underlying HTTP client from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // The blocking client defaults to a 30s timeout; None clears it.
        let client = ReqwestClient::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout_seconds.map(Duration::from_secs))
            .build()
            .map_err(|e| RetagError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn round_trip(&self, request: Request) -> Result<Response> {
        let url = request.url().to_string();
        tracing::trace!(method = %request.method(), url = %url, "sending request");

        let response = self
            .client
            .execute(request)
            .map_err(|e| RetagError::from_reqwest(e, &url))?;

        tracing::trace!(url = %url, status = %response.status(), "received response");
        Ok(response)
    }
}
