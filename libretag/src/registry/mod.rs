//! Registry operations module.
//!
//! This module composes the authenticating transport chain and exposes the
//! manifest-only retag operation: fetch the source manifest, then put the same
//! bytes under a new tag. No layers or blobs are transferred.

use crate::auth::Credentials;
use crate::error::{Result, RetagError};
use crate::transport::{
    BasicAuthTransport, BearerRetryTransport, ClientConfig, HttpTransport, Transport,
    TransportConfig, discard, new_request,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, StatusCode};
use std::sync::Arc;


/// OCI image manifest, v1
pub const OCI_MANIFEST_V1: &str = "application/vnd.oci.image.manifest.v1+json";
/// OCI image index, v1
pub const OCI_INDEX_V1: &str = "application/vnd.oci.image.index.v1+json";
/// Docker manifest list, schema 2
pub const DOCKER_MANIFEST_LIST_V2: &str =
    "application/vnd.docker.distribution.manifest.list.v2+json";
/// Docker image manifest, schema 2
pub const DOCKER_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Manifest media types accepted on fetch, most specific first.
pub const ACCEPTED_MANIFEST_TYPES: [&str; 4] = [
    OCI_MANIFEST_V1,
    OCI_INDEX_V1,
    DOCKER_MANIFEST_LIST_V2,
    DOCKER_MANIFEST_V2,
];

/// The full transport chain used for registry requests.
pub type AuthChain = BasicAuthTransport<BearerRetryTransport<HttpTransport>>;

/// Client for one registry, authenticated with one set of credentials.
///
/// A `Registry` holds no per-request state and caches no tokens, so it can be
/// shared between threads.
#[derive(Debug)]
pub struct Registry {
    transport: AuthChain,
    config: Arc<TransportConfig>,
}

impl Registry {
    /// Creates a registry client from plain values.
    ///
    /// Empty `username` and `password` select anonymous access.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::Registry;
    ///
    /// let registry = Registry::new("https://index.docker.io/", "", "").unwrap();
    /// assert_eq!(registry.registry_url(), "https://index.docker.io");
    /// ```
    pub fn new(registry_url: &str, username: &str, password: &str) -> Result<Self> {
        let config = TransportConfig::new(registry_url, Credentials::from_parts(username, password))?;
        Self::with_config(config, &ClientConfig::default())
    }

    /// Creates a registry client with explicit transport and HTTP settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::Registry;
    /// use libretag::auth::Credentials;
    /// use libretag::transport::{ClientConfig, TransportConfig};
    ///
    /// let config = TransportConfig::new(
    ///     "http://localhost:5000",
    ///     Credentials::basic("user", "pass"),
    /// ).unwrap();
    /// let registry = Registry::with_config(config, &ClientConfig::new().with_timeout(30)).unwrap();
    /// ```
    pub fn with_config(config: TransportConfig, client: &ClientConfig) -> Result<Self> {
        let config = Arc::new(config);
        let base = HttpTransport::new(client)?;
        let transport = BasicAuthTransport::new(
            BearerRetryTransport::new(base, Arc::clone(&config)),
            Arc::clone(&config),
        );

        Ok(Self { transport, config })
    }

    /// Returns the normalized registry base URL.
    pub fn registry_url(&self) -> &str {
        self.config.registry_url()
    }

    /// Returns the manifest URL for `repository` at `reference`.
    ///
    /// The reference is used verbatim, so tags and `sha256:` digests both work.
    ///
    /// # Examples
    ///
    /// ```
    /// use libretag::Registry;
    ///
    /// let registry = Registry::new("http://localhost:5000", "", "").unwrap();
    /// assert_eq!(
    ///     registry.manifest_url("acme/widget", "1.0.0"),
    ///     "http://localhost:5000/v2/acme/widget/manifests/1.0.0"
    /// );
    /// ```
    pub fn manifest_url(&self, repository: &str, reference: &str) -> String {
        format!(
            "{}/v2/{}/manifests/{}",
            self.config.registry_url(),
            repository,
            reference
        )
    }

    /// Points `new_tag` at the manifest currently referenced by `old_reference`.
    ///
    /// Fetches the manifest, then puts the exact bytes and `Content-Type` back
    /// under `new_tag`, so the manifest digest is unchanged.
    ///
    /// # Errors
    ///
    /// - [`RetagError::Http`] if the fetch does not return 200 (nothing is
    ///   written) or the put does not return 201
    /// - [`RetagError::Network`] on any send or receive failure
    /// - [`RetagError::TokenDecode`] if a bearer token response is malformed
    pub fn retag(&self, repository: &str, old_reference: &str, new_tag: &str) -> Result<()> {
        let source_url = self.manifest_url(repository, old_reference);
        let (content_type, manifest) = self.fetch_manifest(&source_url)?;

        let destination_url = self.manifest_url(repository, new_tag);
        self.put_manifest(&destination_url, content_type, manifest)?;

        tracing::info!(
            repository,
            from = old_reference,
            to = new_tag,
            "manifest retagged"
        );
        Ok(())
    }

    fn fetch_manifest(&self, url: &str) -> Result<(Option<HeaderValue>, Vec<u8>)> {
        let accept = HeaderValue::from_str(&ACCEPTED_MANIFEST_TYPES.join(", "))
            .map_err(|e| RetagError::validation_with_source("Invalid Accept header", e))?;
        let mut request = new_request(Method::GET, url)?;
        request.headers_mut().insert(ACCEPT, accept);

        tracing::info!(url, "fetching manifest");
        let response = self.transport.round_trip(request)?;

        let status = response.status();
        if status != StatusCode::OK {
            discard(response);
            return Err(RetagError::http(status.to_string(), url));
        }

        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let manifest = response
            .bytes()
            .map_err(|e| RetagError::from_reqwest(e, url))?;

        tracing::debug!(
            url,
            content_type = ?content_type,
            size = manifest.len(),
            "manifest fetched"
        );
        Ok((content_type, manifest.to_vec()))
    }

    fn put_manifest(
        &self,
        url: &str,
        content_type: Option<HeaderValue>,
        manifest: Vec<u8>,
    ) -> Result<()> {
        let mut request = new_request(Method::PUT, url)?;
        if let Some(content_type) = content_type {
            request.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        *request.body_mut() = Some(manifest.into());

        tracing::info!(url, "putting manifest");
        let response = self.transport.round_trip(request)?;

        let status = response.status();
        discard(response);
        if status != StatusCode::CREATED {
            return Err(RetagError::http(status.to_string(), url));
        }

        Ok(())
    }
}
