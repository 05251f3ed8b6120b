//! Domain errors for credential resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while resolving an AK/SK credential.
///
/// "No credential configured" is not an error; see
/// [`CredentialResolution::Unconfigured`](crate::domain::models::CredentialResolution).
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Exactly one of access key and secret key is set
    #[error("ak or sk is empty")]
    IncompleteKeyPair,

    /// No cipher registered under the configured name
    #[error("cipher plugin [{0}] not found")]
    CipherNotFound(String),

    /// The cipher factory produced no instance
    #[error("cipher plugin [{0}] invalid")]
    CipherInvalid(String),

    /// The cipher rejected the stored secret key
    #[error("decrypt sk failed with cipher plugin [{cipher}]: {reason}")]
    DecryptFailed {
        /// Name of the cipher plugin
        cipher: String,
        /// Error reported by the cipher
        reason: String,
    },

    /// `certificate.yaml` exists but cannot be stat-ed or read
    #[error("cannot access credential file {}: {source}", path.display())]
    CredentialFile {
        /// Path of the credential file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// `certificate.yaml` is not valid YAML of the expected shape
    #[error("cannot parse credential file {}: {source}", path.display())]
    CredentialFileParse {
        /// Path of the credential file
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// The registrator URI does not parse
    #[error("get project from registrator uri {uri} failed: {reason}")]
    InvalidRegistratorUri {
        /// URI as configured
        uri: String,
        /// Parse error
        reason: String,
    },
}

/// Result type for credential resolution
pub type CredentialResult<T> = Result<T, CredentialError>;
