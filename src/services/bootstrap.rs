//! Engine bootstrap service.
//!
//! Resolves the process credential, installs the request signer on a shared
//! transport, asks the engine manager where the engine's registry,
//! configuration server and dashboard live, and hands those addresses back.
//! Runs once on the startup path with no retries.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::errors::CredentialError;
use crate::domain::models::{
    Config, CredentialResolution, CredentialSource, EngineConfig, EngineEndpoints, HttpConfig,
};
use crate::domain::ports::{CipherRegistry, SignError};
use crate::infrastructure::credentials::CredentialResolver;
use crate::infrastructure::engine::{EngineClient, EngineClientError};
use crate::infrastructure::env::BootstrapEnv;
use crate::infrastructure::http::{HttpTransport, TransportError};
use crate::infrastructure::signing::ShaAkskSigner;

/// Errors that abort the bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Credential resolution failed
    #[error("credential resolution failed: {0}")]
    Credential(#[from] CredentialError),

    /// The resolved credential cannot be turned into a signer
    #[error("cannot build request signer: {0}")]
    Signer(#[from] SignError),

    /// The HTTP client could not be built
    #[error("cannot build HTTP transport: {0}")]
    Transport(#[from] TransportError),

    /// No engine-manager address and no region to derive one from
    #[error("engine region is empty; set PAAS_CSE_REGION or servicecomb.engine.region")]
    EmptyRegion,

    /// `servicecomb.engine.name` is empty
    #[error("engine name is empty; set servicecomb.engine.name")]
    NoEngineName,

    /// The metadata request failed or returned an unusable body
    #[error("engine metadata request failed: {0}")]
    Client(#[from] EngineClientError),

    /// A required key is missing from `PrivateEndpoint`
    #[error("engine metadata has no private endpoint {0}")]
    MissingEndpoint(&'static str),
}

/// How outbound requests are authenticated after the bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AuthMode {
    /// Requests carry the `X-Service-*` headers
    Signed {
        /// Access key sent in `X-Service-AK`
        access_key: String,
        /// Project sent in `X-Service-Project`
        project: String,
        /// Where the key pair came from
        source: CredentialSource,
    },
    /// No credential configured; requests go out as-is
    Unsigned,
}

/// Outcome of a successful bootstrap.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// Authentication in effect on `transport`
    pub auth: AuthMode,
    /// Engine-manager endpoint that was queried
    pub target: String,
    /// Engine that was looked up
    pub engine_name: String,
    /// Private endpoints selected from the metadata
    pub endpoints: EngineEndpoints,
    /// Transport carrying the installed signer; reuse it for every later
    /// control plane call
    pub transport: HttpTransport,
}

/// Startup discovery of the engine's control plane endpoints.
pub struct EngineBootstrap {
    resolver: CredentialResolver,
    engine: EngineConfig,
    http: HttpConfig,
    env: BootstrapEnv,
}

impl EngineBootstrap {
    /// Capture the engine, HTTP and credential settings of `config`.
    pub fn new(config: &Config, env: BootstrapEnv, ciphers: CipherRegistry) -> Self {
        Self {
            resolver: CredentialResolver::new(config, env.clone(), ciphers),
            engine: config.servicecomb.engine.clone(),
            http: config.http.clone(),
            env,
        }
    }

    /// Run the bootstrap.
    ///
    /// Endpoints are returned only after the metadata was fetched and every
    /// required key was found; nothing is applied on failure.
    #[instrument(skip(self), fields(engine = %self.engine.name))]
    pub async fn run(&self) -> Result<BootstrapReport, BootstrapError> {
        let resolution = self.resolver.resolve().await?;

        let transport = HttpTransport::new(&self.http)?;
        let auth = match resolution {
            CredentialResolution::Configured { credential, source } => {
                transport.install_signer(Arc::new(ShaAkskSigner::from_credential(&credential)?));
                AuthMode::Signed {
                    access_key: credential.access_key,
                    project: credential.project,
                    source,
                }
            }
            CredentialResolution::Unconfigured => {
                info!("no credential found, requests to the engine manager are unsigned");
                AuthMode::Unsigned
            }
        };

        let engine_name = self.engine.name.trim();
        if engine_name.is_empty() {
            return Err(BootstrapError::NoEngineName);
        }

        let target = target_endpoint(&self.engine, &self.env)?;
        info!(target = %target, engine = engine_name, "discovering engine endpoints");

        let client = EngineClient::with_transport(&target, transport.clone())?;
        let metadata = client.fetch_engine_metadata(engine_name).await?;
        let endpoints = metadata
            .private_endpoints()
            .map_err(BootstrapError::MissingEndpoint)?;

        info!(
            service_center = %endpoints.service_center,
            config_center = %endpoints.config_center,
            dashboard_service = %endpoints.dashboard_service,
            "engine endpoints discovered"
        );

        Ok(BootstrapReport {
            auth,
            target: client.endpoint().to_string(),
            engine_name: engine_name.to_string(),
            endpoints,
            transport,
        })
    }
}

/// Explicit engine-manager address if set, otherwise
/// `https://cse.<region>.<domain>`.
fn target_endpoint(engine: &EngineConfig, env: &BootstrapEnv) -> Result<String, BootstrapError> {
    let manager = env
        .engine_manager_addr
        .as_deref()
        .unwrap_or(&engine.manager_address)
        .trim();
    if !manager.is_empty() {
        return Ok(manager.to_string());
    }

    let region = env.region.as_deref().unwrap_or(&engine.region).trim();
    if region.is_empty() {
        return Err(BootstrapError::EmptyRegion);
    }
    Ok(format!("https://cse.{region}.{}", engine.domain.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(region: &str, manager: &str) -> EngineConfig {
        EngineConfig {
            name: "default".to_string(),
            region: region.to_string(),
            manager_address: manager.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_target_from_region() {
        let target = target_endpoint(&engine("cn-north-1", ""), &BootstrapEnv::default()).unwrap();
        assert_eq!(target, "https://cse.cn-north-1.myhuaweicloud.com");
    }

    #[test]
    fn test_region_env_beats_config() {
        let env = BootstrapEnv {
            region: Some("ap-southeast-1".to_string()),
            ..Default::default()
        };
        let target = target_endpoint(&engine("cn-north-1", ""), &env).unwrap();
        assert_eq!(target, "https://cse.ap-southeast-1.myhuaweicloud.com");
    }

    #[test]
    fn test_manager_address_wins_over_region() {
        let target =
            target_endpoint(&engine("cn-north-1", "https://10.0.0.5:30109"), &BootstrapEnv::default())
                .unwrap();
        assert_eq!(target, "https://10.0.0.5:30109");

        let env = BootstrapEnv {
            engine_manager_addr: Some("https://from-env:30109".to_string()),
            ..Default::default()
        };
        let target = target_endpoint(&engine("", "https://10.0.0.5:30109"), &env).unwrap();
        assert_eq!(target, "https://from-env:30109");
    }

    #[test]
    fn test_empty_region_rejected() {
        let err = target_endpoint(&engine("  ", ""), &BootstrapEnv::default()).unwrap_err();
        assert!(matches!(err, BootstrapError::EmptyRegion));
    }

    #[test]
    fn test_custom_domain() {
        let mut engine = engine("eu-west-0", "");
        engine.domain = "myhuaweicloud.eu".to_string();
        let target = target_endpoint(&engine, &BootstrapEnv::default()).unwrap();
        assert_eq!(target, "https://cse.eu-west-0.myhuaweicloud.eu");
    }

    #[tokio::test]
    async fn test_empty_engine_name_rejected_before_any_request() {
        let mut config = Config::default();
        config.servicecomb.engine.region = "cn-north-1".to_string();

        let err = EngineBootstrap::new(&config, BootstrapEnv::default(), CipherRegistry::new())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, BootstrapError::NoEngineName));
    }

    #[tokio::test]
    async fn test_incomplete_key_pair_aborts() {
        let mut config = Config::default();
        config.servicecomb.engine.name = "default".to_string();
        config.servicecomb.credentials.access_key = Some("ak".to_string());

        let err = EngineBootstrap::new(&config, BootstrapEnv::default(), CipherRegistry::new())
            .run()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::Credential(CredentialError::IncompleteKeyPair)
        ));
    }
}
