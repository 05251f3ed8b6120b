//! AK/SK credential resolution.
//!
//! Sources, first match wins:
//! 1. `${CIPHER_ROOT}/certificate.yaml`, when the variable is set and the
//!    file exists
//! 2. `servicecomb.credentials.*`, falling back per key to the legacy
//!    `cse.credentials.*`
//!
//! Project, first non-empty wins:
//! 1. `PAAS_PROJECT_NAME`
//! 2. the project of the credential block
//! 3. the project embedded in the registrator URI
//! 4. `default`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::domain::errors::{CredentialError, CredentialResult};
use crate::domain::models::{
    CertificateFile, Config, Credential, CredentialResolution, CredentialSource, CredentialsConfig,
    DEFAULT_PROJECT,
};
use crate::domain::ports::CipherRegistry;
use crate::infrastructure::env::BootstrapEnv;

use super::project::project_from_uri;

/// Name of the credential file under the cipher root.
pub const CERTIFICATE_FILE: &str = "certificate.yaml";

/// Resolves the process credential from file, configuration and environment.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    credentials: CredentialsConfig,
    registry_address: String,
    env: BootstrapEnv,
    ciphers: CipherRegistry,
}

impl CredentialResolver {
    /// Build a resolver over the credential keys and registrator URI of
    /// `config`.
    pub fn new(config: &Config, env: BootstrapEnv, ciphers: CipherRegistry) -> Self {
        Self {
            credentials: config
                .servicecomb
                .credentials
                .or_legacy(&config.cse.credentials),
            registry_address: config.servicecomb.registry.address.clone(),
            env,
            ciphers,
        }
    }

    /// Resolve the credential.
    ///
    /// Returns [`CredentialResolution::Unconfigured`] when neither key is set
    /// anywhere; every other problem is an error.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> CredentialResult<CredentialResolution> {
        let (raw, source) = self.load().await?;

        let access_key = raw.access_key.unwrap_or_default();
        let secret_key = raw.secret_key.unwrap_or_default();
        match (access_key.is_empty(), secret_key.is_empty()) {
            (true, true) => {
                debug!(%source, "no access key or secret key configured");
                return Ok(CredentialResolution::Unconfigured);
            }
            (false, false) => {}
            _ => return Err(CredentialError::IncompleteKeyPair),
        }

        let project = self.resolve_project(raw.project.as_deref())?;
        let cipher = raw.aksk_custom_cipher.filter(|name| !name.is_empty());
        let secret_key = match cipher.as_deref() {
            Some(name) => self.decrypt(name, &secret_key).await?,
            None => secret_key,
        };

        info!(
            access_key = %access_key,
            project = %project,
            source = %source,
            cipher = cipher.as_deref().unwrap_or("none"),
            "huawei cloud auth credential resolved"
        );

        Ok(CredentialResolution::Configured {
            credential: Credential {
                access_key,
                secret_key,
                project,
                cipher,
            },
            source,
        })
    }

    async fn load(&self) -> CredentialResult<(CredentialsConfig, CredentialSource)> {
        if let Some(path) = self.certificate_path().await? {
            let credentials = read_certificate(&path).await?;
            return Ok((credentials, CredentialSource::CipherRootFile(path)));
        }
        Ok((self.credentials.clone(), CredentialSource::Configuration))
    }

    /// `${CIPHER_ROOT}/certificate.yaml` if the variable is set and the file
    /// exists. Any stat failure other than "not found" is an error.
    async fn certificate_path(&self) -> CredentialResult<Option<PathBuf>> {
        let Some(root) = &self.env.cipher_root else {
            return Ok(None);
        };
        let path = root.join(CERTIFICATE_FILE);
        match tokio::fs::metadata(&path).await {
            Ok(_) => Ok(Some(path)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no credential file under cipher root");
                Ok(None)
            }
            Err(source) => Err(CredentialError::CredentialFile { path, source }),
        }
    }

    fn resolve_project(&self, from_credentials: Option<&str>) -> CredentialResult<String> {
        if let Some(project) = self.env.project_name.as_deref().filter(|p| !p.is_empty()) {
            return Ok(project.to_string());
        }
        if let Some(project) = from_credentials.filter(|p| !p.is_empty()) {
            return Ok(project.to_string());
        }
        Ok(project_from_uri(&self.registry_address)?
            .unwrap_or_else(|| DEFAULT_PROJECT.to_string()))
    }

    async fn decrypt(&self, name: &str, ciphertext: &str) -> CredentialResult<String> {
        let cipher = self.ciphers.instantiate(name)?;
        cipher
            .decrypt(ciphertext)
            .await
            .map_err(|e| CredentialError::DecryptFailed {
                cipher: name.to_string(),
                reason: format!("{e:#}"),
            })
    }
}

async fn read_certificate(path: &Path) -> CredentialResult<CredentialsConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CredentialError::CredentialFile {
            path: path.to_path_buf(),
            source,
        })?;
    let file: CertificateFile =
        serde_yaml::from_str(&content).map_err(|source| CredentialError::CredentialFileParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(file.service_comb.credentials)
}
