//! Domain models: configuration, credentials and engine metadata.

pub mod config;
pub mod credential;
pub mod engine;

pub use config::{
    Config, CredentialsConfig, EngineConfig, HttpConfig, LoggingConfig, ServiceCombConfig,
};
pub use credential::{
    CertificateFile, Credential, CredentialResolution, CredentialSource, DEFAULT_PROJECT,
};
pub use engine::{EngineEndpoints, EngineMetadata, EngineMetadataDocument};
