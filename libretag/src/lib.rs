//! retag - manifest-only image retagging for container registries
//!
//! `libretag` points a new tag at an existing image by copying its manifest
//! through the registry HTTP API. Layers are never transferred.
//!
//! # Quick Start
//!
//! ```no_run
//! use libretag::Registry;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::new("https://index.docker.io/", "user", "password")?;
//!     registry.retag("acme/widget", "1.0.0", "1.0.1")?;
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! Requests travel through a small transport chain:
//!
//! - [`transport::BasicAuthTransport`] adds Basic credentials to requests for
//!   the registry host only
//! - [`transport::BearerRetryTransport`] answers a 401 `Bearer` challenge by
//!   fetching a token from the challenge realm and replaying the request once
//! - [`transport::HttpTransport`] sends the request with a blocking reqwest client
//!
//! Tokens are never cached; each challenged request performs its own exchange.

#![warn(clippy::all)]

/// Returns the libretag crate version.
///
/// # Examples
///
/// ```
/// let version = libretag::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod auth;
pub mod error;
pub mod registry;
pub mod transport;

pub use auth::Credentials;
pub use error::{Result, RetagError};
pub use registry::Registry;
