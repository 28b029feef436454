//! Network round trip for JSON-RPC envelopes.

use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::Result;

/// Trait for the HTTP round trip.
///
/// This trait abstracts the network layer to enable:
/// - Dependency injection for testing with scripted responses
/// - Swapping the HTTP stack without touching the session or facades
pub trait Transport: Send + Sync {
    /// POST `body` to `url` and return the raw response body.
    ///
    /// Any failure to obtain a body must surface as [`SaploError::Network`].
    fn post(&self, url: &Url, body: Vec<u8>) -> Result<Vec<u8>>;
}

/// Build the endpoint URL for a session token.
///
/// The token is appended as the `access_token` query parameter; an empty
/// token yields `access_token=`.
pub fn endpoint_url(endpoint: &Url, token: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut().append_pair("access_token", token);
    url
}

/// Blocking HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Build a transport from the client configuration.
    ///
    /// No timeout is applied unless `config.timeout` is set.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &Url, body: Vec<u8>) -> Result<Vec<u8>> {
        debug!(host = url.host_str().unwrap_or(""), bytes = body.len(), "POST rpc");

        let response = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()?
            .error_for_status()?;

        let bytes = response.bytes()?;
        debug!(bytes = bytes.len(), "rpc response received");
        Ok(bytes.to_vec())
    }
}
