//! engine-bootstrap - control plane discovery for service-mesh workloads
//!
//! At startup a workload resolves its AK/SK credential, signs outbound
//! requests with it, and asks the engine manager where the service
//! registry, configuration server and dashboard of its engine live.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): configuration and credential models, the
//!   engine metadata document, and the cipher and signer ports
//! - **Infrastructure Layer** (`infrastructure`): config loading, logging,
//!   credential resolution, signing, HTTP transport, engine-manager client
//! - **Service Layer** (`services`): the bootstrap workflow
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use engine_bootstrap::{BootstrapEnv, CipherRegistry, ConfigLoader, EngineBootstrap};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut config = ConfigLoader::load(None)?;
//!     let report = EngineBootstrap::new(&config, BootstrapEnv::from_process(), CipherRegistry::new())
//!         .run()
//!         .await?;
//!     report.endpoints.apply_to(&mut config);
//!     // report.transport signs every later control plane call
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, Credential, CredentialResolution, CredentialSource, EngineEndpoints, EngineMetadata,
};
pub use domain::ports::{Cipher, CipherRegistry, RequestSigner, SignError};
pub use domain::{CredentialError, CredentialResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::credentials::CredentialResolver;
pub use infrastructure::engine::{EngineClient, EngineClientError};
pub use infrastructure::env::BootstrapEnv;
pub use infrastructure::http::{HttpTransport, TransportError};
pub use infrastructure::signing::{ShaAkskSigner, V4Signer};
pub use services::{AuthMode, BootstrapError, BootstrapReport, EngineBootstrap};
