//! Request signer port.

use thiserror::Error;

/// Errors raised while building a signer or signing a request.
#[derive(Debug, Error)]
pub enum SignError {
    /// The value cannot be carried in an HTTP header
    #[error("value for header {header} is not a valid HTTP header value")]
    InvalidHeaderValue {
        /// Header the value was meant for
        header: &'static str,
    },

    /// The HMAC key was rejected
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// The body is a stream and cannot be hashed
    #[error("streaming request bodies cannot be signed")]
    StreamingBody,
}

/// Attaches authentication material to outbound requests.
///
/// Implementations capture only immutable values, so one instance can sign
/// requests from many tasks at once.
pub trait RequestSigner: Send + Sync {
    /// Short name of the signing scheme, used in logs.
    fn scheme(&self) -> &'static str;

    /// Sign `request` in place.
    fn sign(&self, request: &mut reqwest::Request) -> Result<(), SignError>;
}
