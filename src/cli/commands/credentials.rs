//! `credentials`: resolve the AK/SK credential without contacting the
//! engine manager.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, CredentialResolution};
use crate::domain::ports::CipherRegistry;
use crate::infrastructure::credentials::CredentialResolver;
use crate::infrastructure::env::BootstrapEnv;

/// Resolved credential, minus the secret key.
#[derive(Debug, Serialize)]
pub struct CredentialsOutput {
    /// Whether a key pair was found
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Access key
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Resolved project
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Where the key pair was read from
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Cipher plugin used on the secret key
    pub cipher: Option<String>,
}

impl From<&CredentialResolution> for CredentialsOutput {
    fn from(resolution: &CredentialResolution) -> Self {
        match resolution {
            CredentialResolution::Configured { credential, source } => Self {
                configured: true,
                access_key: Some(credential.access_key.clone()),
                project: Some(credential.project.clone()),
                source: Some(source.to_string()),
                cipher: credential.cipher.clone(),
            },
            CredentialResolution::Unconfigured => Self {
                configured: false,
                access_key: None,
                project: None,
                source: None,
                cipher: None,
            },
        }
    }
}

impl CommandOutput for CredentialsOutput {
    fn to_human(&self) -> String {
        if !self.configured {
            return "No credential configured; requests will be unsigned.".to_string();
        }

        let mut lines = vec![
            format!("Access key: {}", self.access_key.as_deref().unwrap_or_default()),
            format!("Project: {}", self.project.as_deref().unwrap_or_default()),
            format!("Source: {}", self.source.as_deref().unwrap_or_default()),
        ];
        if let Some(cipher) = &self.cipher {
            lines.push(format!("Cipher: {cipher}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Resolve the credential and print it.
pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let resolution =
        CredentialResolver::new(config, BootstrapEnv::from_process(), CipherRegistry::new())
            .resolve()
            .await
            .context("Credential resolution failed")?;

    output(&CredentialsOutput::from(&resolution), json_mode);
    Ok(())
}
