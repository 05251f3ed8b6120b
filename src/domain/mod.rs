//! Domain layer for engine bootstrap
//!
//! Credential and engine metadata models, the errors raised while resolving
//! them, and the ports (cipher, request signer) that infrastructure adapters
//! implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{CredentialError, CredentialResult};
