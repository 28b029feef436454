//! Session establishment via `auth.accessToken`.
//!
//! ```text
//! Unauthenticated ──► Authenticating ──► Authenticated
//!                            │
//!                            └─────────► Failed (construction aborts)
//! ```
//!
//! The token is written once, before the client is handed out, and never
//! changes afterwards. There is no refresh: an expired token surfaces as a
//! remote error on later calls.

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::error::{Result, SaploError};
use crate::rpc::{check_error, decode_response, encode_request, endpoint_url, Transport};

/// RPC method that exchanges credentials for a session token.
pub const AUTH_METHOD: &str = "auth.accessToken";

/// Request id sent with every envelope. Calls are sequential so it is
/// never used for correlation.
pub const REQUEST_ID: u64 = 0;

/// Authentication progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Failed,
}

/// An established session.
///
/// Only obtainable through [`Session::establish`], so holding one means the
/// token was issued by the service.
#[derive(Clone)]
pub struct Session {
    credentials: Credentials,
    token: String,
}

impl Session {
    /// Authenticate and return the session.
    ///
    /// `seed_token` is only placed in the URL of the auth request; the stored
    /// token is always the one the service returns.
    ///
    /// # Errors
    ///
    /// Returns `SaploError::Authentication` if the round trip fails, the
    /// service answers with an error, or `result.access_token` is missing.
    pub fn establish(
        transport: &dyn Transport,
        endpoint: &url::Url,
        credentials: Credentials,
        seed_token: Option<&str>,
    ) -> Result<Self> {
        let mut state = SessionState::Unauthenticated;
        debug!(?state, api_key = credentials.api_key(), "establishing session");

        state = SessionState::Authenticating;
        debug!(?state, "requesting {}", AUTH_METHOD);

        match authenticate(transport, endpoint, &credentials, seed_token.unwrap_or("")) {
            Ok(token) => {
                state = SessionState::Authenticated;
                info!(?state, "session established");
                Ok(Self { credentials, token })
            }
            Err(err) => {
                state = SessionState::Failed;
                warn!(?state, "authentication failed: {}", err);
                Err(err)
            }
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.credentials)
            .field("token", &"<redacted>")
            .finish()
    }
}

fn authenticate(
    transport: &dyn Transport,
    endpoint: &url::Url,
    credentials: &Credentials,
    seed_token: &str,
) -> Result<String> {
    let params = json!({
        "api_key": credentials.api_key(),
        "secret_key": credentials.secret_key(),
    });

    let envelope = encode_request(AUTH_METHOD, &params, REQUEST_ID)
        .and_then(|body| transport.post(&endpoint_url(endpoint, seed_token), body))
        .and_then(|raw| decode_response(&raw))
        .and_then(check_error)
        .map_err(SaploError::into_authentication)?;

    extract_token(&envelope)
}

fn extract_token(envelope: &Value) -> Result<String> {
    envelope
        .pointer("/result/access_token")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| SaploError::Authentication {
            message: "Response missing result.access_token".to_string(),
            code: None,
        })
}
