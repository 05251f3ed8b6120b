//! Credentials management infrastructure
//!
//! AK/SK credential resolution:
//! - `certificate.yaml` under the cipher root
//! - current and legacy configuration namespaces
//! - secret key decryption through a named cipher
//! - project derivation

pub mod project;
pub mod resolver;

pub use project::project_from_uri;
pub use resolver::{CredentialResolver, CERTIFICATE_FILE};
