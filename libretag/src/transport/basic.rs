//! Basic credential injection for requests to the registry host.

use super::{Transport, TransportConfig};
use crate::error::{Result, RetagError};
use reqwest::blocking::{Request, Response};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::sync::Arc;

#[cfg(test)]
#[path = "basic_tests.rs"]
mod basic_tests;

/// Attaches `Authorization: Basic` to requests under the registry base URL.
///
/// Requests to any other URL, such as a token realm on a separate host, pass
/// through untouched so registry credentials never leave the registry.
#[derive(Debug)]
pub struct BasicAuthTransport<T> {
    inner: T,
    config: Arc<TransportConfig>,
}

impl<T: Transport> BasicAuthTransport<T> {
    /// Wraps `inner`, reading the base URL and credentials from `config`.
    pub fn new(inner: T, config: Arc<TransportConfig>) -> Self {
        Self { inner, config }
    }

    fn applies_to(&self, request: &Request) -> bool {
        request.url().as_str().starts_with(self.config.registry_url())
    }
}

impl<T: Transport> Transport for BasicAuthTransport<T> {
    fn round_trip(&self, mut request: Request) -> Result<Response> {
        if self.applies_to(&request)
            && let Some(auth_header) = self.config.credentials().to_header_value()
        {
            let value = HeaderValue::from_str(&auth_header).map_err(|e| {
                RetagError::validation_with_source("Credentials cannot be sent as a header", e)
            })?;
            request.headers_mut().insert(AUTHORIZATION, value);
            tracing::debug!(url = %request.url(), "attached basic credentials");
        }

        self.inner.round_trip(request)
    }
}
