//! Bearer token exchange against a challenge realm.

use super::{Transport, new_request};
use crate::auth::{BearerChallenge, Credentials};
use crate::error::{Result, RetagError};
use reqwest::blocking::Response;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;

#[cfg(test)]
#[path = "token_tests.rs"]
mod token_tests;

/// Body of a successful token endpoint response.
#[derive(Debug, Deserialize)]
struct AuthToken {
    token: String,
}

/// Result of a token exchange that reached the token endpoint.
#[derive(Debug)]
pub enum TokenOutcome {
    /// The endpoint issued a token.
    Token(String),
    /// The endpoint answered with a status other than 200.
    Rejected(Response),
}

/// Requests a bearer token from the realm named in a challenge.
#[derive(Debug, Clone, Copy)]
pub struct TokenExchange<'a> {
    credentials: &'a Credentials,
}

impl<'a> TokenExchange<'a> {
    /// Creates an exchange that authenticates with `credentials` unless they
    /// are anonymous.
    pub fn new(credentials: &'a Credentials) -> Self {
        Self { credentials }
    }

    /// Builds the token endpoint URL for `challenge`.
    ///
    /// `service` is always set and `scope` only when non-empty. Query
    /// parameters already on the realm are kept; `service` and `scope` replace
    /// any existing values.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::auth::BearerChallenge;
    /// use libretag::transport::TokenExchange;
    ///
    /// let challenge = BearerChallenge {
    ///     realm: "https://auth.example/token".to_string(),
    ///     service: "registry.example".to_string(),
    ///     scope: String::new(),
    /// };
    /// let url = TokenExchange::token_url(&challenge).unwrap();
    /// assert_eq!(url.as_str(), "https://auth.example/token?service=registry.example");
    /// ```
    pub fn token_url(challenge: &BearerChallenge) -> Result<Url> {
        let mut url = Url::parse(&challenge.realm).map_err(|e| {
            RetagError::validation_with_source(
                format!("Invalid token realm: {:?}", challenge.realm),
                e,
            )
        })?;

        let replace_scope = !challenge.scope.is_empty();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "service" && !(replace_scope && key == "scope"))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.extend_pairs(kept);
            query.append_pair("service", &challenge.service);
            if replace_scope {
                query.append_pair("scope", &challenge.scope);
            }
        }

        Ok(url)
    }

    /// Runs the exchange through `transport`.
    ///
    /// `transport` must be the layer below the bearer retry so the exchange
    /// itself is never challenged and retried.
    pub fn fetch<T: Transport + ?Sized>(
        &self,
        challenge: &BearerChallenge,
        transport: &T,
    ) -> Result<TokenOutcome> {
        let url = Self::token_url(challenge)?;
        let mut request = new_request(Method::GET, url.as_str())?;

        if let Some(auth_header) = self.credentials.to_header_value() {
            let value = HeaderValue::from_str(&auth_header).map_err(|e| {
                RetagError::validation_with_source("Credentials cannot be sent as a header", e)
            })?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        tracing::debug!(
            realm = %challenge.realm,
            service = %challenge.service,
            scope = %challenge.scope,
            "requesting bearer token"
        );

        let response = transport.round_trip(request)?;
        if response.status() != StatusCode::OK {
            tracing::debug!(status = %response.status(), "token endpoint rejected request");
            return Ok(TokenOutcome::Rejected(response));
        }

        let body = response
            .bytes()
            .map_err(|e| RetagError::from_reqwest(e, url.as_str()))?;
        let token: AuthToken = serde_json::from_slice(&body).map_err(|e| {
            RetagError::token_decode_with_source(
                format!("Failed to decode token from {}", url),
                e,
            )
        })?;

        tracing::debug!(length = token.token.len(), "bearer token obtained");
        Ok(TokenOutcome::Token(token.token))
    }
}
