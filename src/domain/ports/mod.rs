//! Port trait definitions (Hexagonal Architecture)
//!
//! Interfaces the bootstrap core depends on:
//! - Cipher: decryption of stored secret keys, looked up by name
//! - RequestSigner: authentication of outbound HTTP requests

pub mod cipher;
pub mod signer;

pub use cipher::{Cipher, CipherFactory, CipherRegistry};
pub use signer::{RequestSigner, SignError};
