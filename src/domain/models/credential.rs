//! Resolved AK/SK credential and the on-disk certificate file layout.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::CredentialsConfig;

/// Project used when no other source provides one.
pub const DEFAULT_PROJECT: &str = "default";

/// A fully resolved credential.
///
/// `secret_key` is plaintext: any cipher has already been applied.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Access key, sent in clear
    pub access_key: String,
    /// Plaintext secret key
    pub secret_key: String,
    /// Project scope, never empty
    pub project: String,
    /// Cipher plugin that decrypted the secret, if any
    pub cipher: Option<String>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .field("project", &self.project)
            .field("cipher", &self.cipher)
            .finish()
    }
}

/// Where the key pair was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum CredentialSource {
    /// `certificate.yaml` under the cipher root
    CipherRootFile(PathBuf),
    /// The process configuration store
    Configuration,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CipherRootFile(path) => write!(f, "file {}", path.display()),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Outcome of credential resolution that is not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialResolution {
    /// A usable credential was found
    Configured {
        /// The resolved key pair and project
        credential: Credential,
        /// Where the key pair was read from
        source: CredentialSource,
    },
    /// Neither access key nor secret key is set anywhere
    Unconfigured,
}

impl CredentialResolution {
    /// The credential, if one was configured.
    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Configured { credential, .. } => Some(credential),
            Self::Unconfigured => None,
        }
    }
}

/// Layout of `certificate.yaml`:
///
/// ```yaml
/// serviceComb:
///   credentials:
///     accessKey: ...
///     secretKey: ...
///     project: ...
///     akskCustomCipher: ...
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateFile {
    /// The `serviceComb` block
    #[serde(default)]
    pub service_comb: CertificateSection,
}

/// The `serviceComb` block of `certificate.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateSection {
    /// Same keys as `servicecomb.credentials`
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_file_parses() {
        let yaml = r"
serviceComb:
  credentials:
    accessKey: file-ak
    secretKey: file-sk
    project: proj-file
    akskCustomCipher: vault
";
        let file: CertificateFile = serde_yaml::from_str(yaml).expect("should parse");
        let creds = file.service_comb.credentials;
        assert_eq!(creds.access_key.as_deref(), Some("file-ak"));
        assert_eq!(creds.secret_key.as_deref(), Some("file-sk"));
        assert_eq!(creds.project.as_deref(), Some("proj-file"));
        assert_eq!(creds.aksk_custom_cipher.as_deref(), Some("vault"));
    }

    #[test]
    fn test_credential_debug_hides_secret() {
        let credential = Credential {
            access_key: "ak".to_string(),
            secret_key: "hidden-sk".to_string(),
            project: DEFAULT_PROJECT.to_string(),
            cipher: None,
        };
        assert!(!format!("{credential:?}").contains("hidden-sk"));
    }
}
