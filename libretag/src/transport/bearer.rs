//! Single-shot retry after a Bearer `WWW-Authenticate` challenge.

use super::token::{TokenExchange, TokenOutcome};
use super::{Transport, TransportConfig, discard};
use crate::auth::{BearerChallenge, challenge};
use crate::error::{Result, RetagError};
use reqwest::StatusCode;
use reqwest::blocking::{Request, Response};
use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::sync::Arc;

#[cfg(test)]
#[path = "bearer_tests.rs"]
mod bearer_tests;

/// Answers a 401 Bearer challenge with a token exchange and one replay.
///
/// The flow per request is:
///
/// 1. forward; errors and non-401 responses are returned as-is,
/// 2. on 401, pick the first `bearer` challenge; without one the 401 is
///    returned as-is,
/// 3. exchange the challenge for a token through the inner transport,
/// 4. replay the request once with `Authorization: Bearer <token>` and return
///    whatever comes back, including another 401.
///
/// Tokens are not cached; every challenged request performs its own exchange.
#[derive(Debug)]
pub struct BearerRetryTransport<T> {
    inner: T,
    config: Arc<TransportConfig>,
}

impl<T: Transport> BearerRetryTransport<T> {
    /// Wraps `inner`; token exchanges use the credentials in `config`.
    pub fn new(inner: T, config: Arc<TransportConfig>) -> Self {
        Self { inner, config }
    }

    fn authenticate_and_retry(
        &self,
        challenge: &BearerChallenge,
        mut replay: Request,
    ) -> Result<Response> {
        let exchange = TokenExchange::new(self.config.credentials());
        let token = match exchange.fetch(challenge, &self.inner)? {
            TokenOutcome::Token(token) => token,
            TokenOutcome::Rejected(response) => return Ok(response),
        };

        let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
            RetagError::validation_with_source("Bearer token cannot be sent as a header", e)
        })?;
        replay.headers_mut().insert(AUTHORIZATION, value);

        tracing::debug!(url = %replay.url(), "retrying request with bearer token");
        self.inner.round_trip(replay)
    }
}

impl<T: Transport> Transport for BearerRetryTransport<T> {
    fn round_trip(&self, request: Request) -> Result<Response> {
        // Bodies are buffered, so this is only None for streaming uploads.
        let replay = request.try_clone();

        let response = self.inner.round_trip(request)?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let challenges = challenge::from_headers(response.headers());
        let Some(bearer) = challenges.iter().find_map(BearerChallenge::from_challenge) else {
            tracing::debug!(url = %response.url(), "401 without a bearer challenge");
            return Ok(response);
        };

        let Some(replay) = replay else {
            tracing::debug!(url = %response.url(), "request body cannot be replayed");
            return Ok(response);
        };

        discard(response);
        self.authenticate_and_retry(&bearer, replay)
    }
}
