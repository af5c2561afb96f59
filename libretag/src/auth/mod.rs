//! Authentication handling for container registries.
//!
//! This module provides the credential types used by the transport chain and
//! the `WWW-Authenticate` challenge parser that drives the Bearer token flow.

pub mod challenge;

pub use challenge::{AuthChallenge, BearerChallenge, parse_challenges};

#[cfg(test)]
mod tests;

/// Credentials for registry authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication (anonymous access)
    Anonymous,

    /// HTTP Basic authentication with username and password
    Basic {
        /// Username for authentication
        username: String,
        /// Password for authentication
        password: String,
    },
}

impl Credentials {
    /// Creates anonymous credentials.
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Creates Basic authentication credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::auth::Credentials;
    ///
    /// let creds = Credentials::basic("username", "password");
    /// assert!(!creds.is_anonymous());
    /// ```
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds credentials from a possibly empty username and password.
    ///
    /// Both empty means anonymous access. A single non-empty half still
    /// yields Basic credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::auth::Credentials;
    ///
    /// assert_eq!(Credentials::from_parts("", ""), Credentials::Anonymous);
    /// assert_eq!(Credentials::from_parts("ci", ""), Credentials::basic("ci", ""));
    /// ```
    pub fn from_parts(username: &str, password: &str) -> Self {
        if username.is_empty() && password.is_empty() {
            Self::Anonymous
        } else {
            Self::basic(username, password)
        }
    }

    /// Returns true when no Authorization header would be sent.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Returns the Authorization header value for these credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::auth::Credentials;
    ///
    /// let creds = Credentials::basic("user", "pass");
    /// assert_eq!(creds.to_header_value().as_deref(), Some("Basic dXNlcjpwYXNz"));
    /// ```
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, password } => {
                use base64::{Engine as _, engine::general_purpose};
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {}", encoded))
            }
        }
    }
}
