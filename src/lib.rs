//! Saplo API client library
//!
//! This library provides a blocking client for the Saplo JSON-RPC text
//! analysis API:
//!
//! - `client` - authenticated [`SaploClient`] and its builder
//! - `resources` - Account, Collection, Group and Text facades
//! - `rpc` - envelope codec, trimming and the HTTP transport
//! - `session` - `auth.accessToken` token acquisition
//! - `config` - endpoint/timeout settings and credentials
//!
//! # Usage
//!
//! ```no_run
//! use saplo::{SaploClient, SaploError};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), SaploError> {
//! let client = SaploClient::new("api-key", "secret-key")?;
//!
//! let collection = client.collection().create(json!({"name": "C1", "language": "en"}))?;
//! match client.text().tags(json!({"collection_id": 1, "text_id": 2})) {
//!     Ok(tags) => println!("{}", tags),
//!     Err(SaploError::Remote(err)) => eprintln!("service said: {}", err.message),
//!     Err(other) => return Err(other),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod resources;
pub mod rpc;
pub mod session;

pub use client::{SaploClient, SaploClientBuilder};
pub use config::{ClientConfig, Credentials};
pub use error::{RemoteError, Result, SaploError};
pub use resources::{Account, Collection, Group, Operation, Text};
pub use rpc::{HttpTransport, Transport, TrimPolicy};
