//! Request signing
//!
//! [`ShaAkskSigner`] is what the engine bootstrap installs; [`V4Signer`]
//! adds a canonical-request signature for gateways that require one.

pub mod sha_aksk;
pub mod v4;

pub use sha_aksk::{
    hmac_sha256_hex, sha_aksk_signature, ShaAkskSigner, HEADER_SERVICE_AK,
    HEADER_SERVICE_PROJECT, HEADER_SERVICE_SHA_AKSK,
};
pub use v4::{V4Signer, ALGORITHM, HEADER_SDK_DATE};
