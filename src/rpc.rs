//! JSON-RPC plumbing for the Saplo API.
//!
//! Every remote call is a single HTTP POST carrying a JSON envelope:
//!
//! ```text
//! POST http://api.saplo.com/rpc/json?access_token=<token>
//!
//! {"method":"collection.create","params":{"name":"C1"},"id":0}
//! ```
//!
//! and the service answers with either `{"result": ...}` or
//! `{"error": {"msg": ..., "code": ...}}`.
//!
//! - `envelope` - request encoding, response decoding, error detection, trimming
//! - `transport` - the [`Transport`] seam and its blocking HTTP implementation

mod envelope;
mod transport;

pub use envelope::{apply_trim, check_error, decode_response, encode_request, RpcRequest, TrimPolicy};
pub use transport::{endpoint_url, HttpTransport, Transport};
