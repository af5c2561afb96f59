//! Error types for retag
//!
//! Every failure aborts the whole retag attempt. Nothing in this crate retries
//! on error; the only replay is the single bearer-challenge retry performed by
//! the transport chain.

use thiserror::Error;

#[cfg(test)]
mod tests;

/// Main error type for retag operations
#[derive(Error, Debug)]
pub enum RetagError {
    /// Network-related errors (connection, timeout, DNS, body read)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A response arrived but its status was not the one the step required
    #[error("HTTP {status} when accessing {url:?}")]
    Http { status: String, url: String },

    /// The token endpoint answered 200 with a body that is not a token payload
    #[error("Invalid token response: {message}")]
    TokenDecode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors (bad registry URL, bad realm URL, unencodable header)
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for retag operations
pub type Result<T> = std::result::Result<T, RetagError>;

impl RetagError {
    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::error::RetagError;
    ///
    /// let err = RetagError::network("connection refused");
    /// assert!(matches!(err, RetagError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new HTTP status error.
    ///
    /// `status` is the literal status line text, e.g. `"404 Not Found"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::error::RetagError;
    ///
    /// let err = RetagError::http("404 Not Found", "https://registry.example/v2/a/manifests/1");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "HTTP 404 Not Found when accessing \"https://registry.example/v2/a/manifests/1\""
    /// );
    /// ```
    pub fn http<S: Into<String>, U: Into<String>>(status: S, url: U) -> Self {
        Self::Http {
            status: status.into(),
            url: url.into(),
        }
    }

    /// Creates a new token decode error with a source error.
    pub fn token_decode_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::TokenDecode {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::error::RetagError;
    ///
    /// let err = RetagError::validation("Registry URL cannot be empty");
    /// assert!(matches!(err, RetagError::Validation { .. }));
    /// ```
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Translates a reqwest error into a network error for the given URL.
    pub(crate) fn from_reqwest(error: reqwest::Error, url: &str) -> Self {
        if error.is_timeout() {
            Self::network_with_source(format!("Request to {} timed out", url), error)
        } else if error.is_connect() {
            Self::network_with_source(format!("Failed to connect to {}", url), error)
        } else if error.is_body() || error.is_decode() {
            Self::network_with_source(format!("Failed to read response from {}", url), error)
        } else {
            Self::network_with_source(format!("Network error communicating with {}", url), error)
        }
    }
}
