//! Authenticated client for the Saplo JSON-RPC API.
//!
//! `SaploClient` authenticates once at construction and then provides the
//! generic [`SaploClient::call`] primitive that every resource facade is
//! built on.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{ClientConfig, Credentials};
use crate::error::{Result, SaploError};
use crate::resources::{Account, Collection, Group, Text};
use crate::rpc::{
    apply_trim, check_error, decode_response, encode_request, endpoint_url, HttpTransport,
    Transport, TrimPolicy,
};
use crate::session::{Session, REQUEST_ID};

/// Client for the Saplo API.
///
/// Construction performs the `auth.accessToken` round trip; a value of this
/// type always holds a valid session token. The token is never modified
/// after construction, so the client can be shared across threads by
/// reference.
///
/// # Example
///
/// ```no_run
/// use saplo::SaploClient;
/// use serde_json::json;
///
/// # fn main() -> saplo::Result<()> {
/// let client = SaploClient::new("api-key", "secret-key")?;
///
/// let collection = client.collection().create(json!({"name": "News", "language": "en"}))?;
/// let texts = client.group().trim(false).list_texts(json!({"group_id": 7}))?;
/// # Ok(())
/// # }
/// ```
pub struct SaploClient {
    config: ClientConfig,
    transport: Box<dyn Transport>,
    session: Session,
}

impl SaploClient {
    /// Authenticate against the default endpoint.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key, secret_key).connect()
    }

    /// Authenticate, sending `token` with the auth request.
    ///
    /// The token returned by the service always replaces `token`.
    pub fn with_token(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self> {
        let mut builder = Self::builder(api_key, secret_key);
        if let Some(token) = token {
            builder = builder.token(token);
        }
        builder.connect()
    }

    pub fn builder(api_key: impl Into<String>, secret_key: impl Into<String>) -> SaploClientBuilder {
        SaploClientBuilder::new(Credentials::new(api_key, secret_key))
    }

    /// Session token issued by the service.
    pub fn token(&self) -> &str {
        self.session.token()
    }

    pub fn credentials(&self) -> &Credentials {
        self.session.credentials()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a JSON-RPC request and return the decoded response.
    ///
    /// This method:
    /// 1. Encodes `{method, params, id}` and POSTs it with the session token
    /// 2. Decodes the body as JSON
    /// 3. Fails with `SaploError::Remote` if the envelope carries an error,
    ///    regardless of `trim`
    /// 4. Applies `trim` to the successful envelope
    ///
    /// # Errors
    ///
    /// - `SaploError::Network` if the round trip fails
    /// - `SaploError::Protocol` if the body is not JSON or trimming finds no
    ///   `result`
    /// - `SaploError::Remote` if the service reported an error
    pub fn call(&self, method: &str, params: Value, trim: &TrimPolicy) -> Result<Value> {
        let envelope = self.send(method, &params)?;
        let envelope = check_error(envelope)?;
        apply_trim(envelope, trim)
    }

    /// Round trip without error checking or trimming.
    fn send(&self, method: &str, params: &Value) -> Result<Value> {
        debug!(method, "rpc call");
        let body = encode_request(method, params, REQUEST_ID)?;
        let url = endpoint_url(&self.config.endpoint, self.session.token());
        let raw = self.transport.post(&url, body)?;
        decode_response(&raw)
    }

    pub fn account(&self) -> Account<'_> {
        Account::new(self)
    }

    pub fn collection(&self) -> Collection<'_> {
        Collection::new(self)
    }

    pub fn group(&self) -> Group<'_> {
        Group::new(self)
    }

    pub fn text(&self) -> Text<'_> {
        Text::new(self)
    }
}

impl std::fmt::Debug for SaploClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaploClient")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SaploClient`].
pub struct SaploClientBuilder {
    credentials: Credentials,
    token: Option<String>,
    config: ClientConfig,
    transport: Option<Box<dyn Transport>>,
}

impl SaploClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            token: None,
            config: ClientConfig::default(),
            transport: None,
        }
    }

    /// Token to send with the auth request. Replaced after authentication.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn endpoint(mut self, endpoint: Url) -> Self {
        self.config.endpoint = endpoint;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Use a custom transport instead of the HTTP one built from the config.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Authenticate and return the client.
    ///
    /// # Errors
    ///
    /// Returns `SaploError::Authentication` if no token could be obtained;
    /// no client exists in that case.
    pub fn connect(self) -> Result<SaploClient> {
        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Box::new(
                HttpTransport::new(&self.config).map_err(SaploError::into_authentication)?,
            ),
        };

        let session = Session::establish(
            transport.as_ref(),
            &self.config.endpoint,
            self.credentials,
            self.token.as_deref(),
        )?;

        Ok(SaploClient {
            config: self.config,
            transport,
            session,
        })
    }
}
