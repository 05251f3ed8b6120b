//! `discover`: run the engine bootstrap and print the endpoints.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{endpoints_table, output, CommandOutput};
use crate::domain::models::{Config, EngineEndpoints};
use crate::domain::ports::CipherRegistry;
use crate::infrastructure::env::BootstrapEnv;
use crate::services::{AuthMode, BootstrapReport, EngineBootstrap};

/// Bootstrap result plus the configuration it produced.
#[derive(Debug, Serialize)]
pub struct DiscoverOutput {
    /// Engine that was looked up
    pub engine: String,
    /// Engine-manager endpoint that was queried
    pub target: String,
    /// Authentication used for the query
    pub auth: AuthMode,
    /// Endpoints selected from the metadata
    pub endpoints: EngineEndpoints,
    /// Endpoint config keys and their values after `apply_to`
    pub applied: BTreeMap<&'static str, String>,
}

impl DiscoverOutput {
    /// Apply the report's endpoints to a copy of `config` and read the
    /// written keys back.
    pub fn new(report: &BootstrapReport, config: &Config) -> Self {
        let mut applied = config.clone();
        report.endpoints.apply_to(&mut applied);

        let servicecomb = applied.servicecomb;
        Self {
            engine: report.engine_name.clone(),
            target: report.target.clone(),
            auth: report.auth.clone(),
            endpoints: report.endpoints.clone(),
            applied: BTreeMap::from([
                ("servicecomb.registry.address", servicecomb.registry.address),
                (
                    "servicecomb.config.client.serverUri",
                    servicecomb.config.client.server_uri,
                ),
                (
                    "servicecomb.monitor.client.serverUri",
                    servicecomb.monitor.client.server_uri,
                ),
            ]),
        }
    }
}

impl CommandOutput for DiscoverOutput {
    fn to_human(&self) -> String {
        let auth = match &self.auth {
            AuthMode::Signed {
                access_key,
                project,
                ..
            } => format!("signed (ak {access_key}, project {project})"),
            AuthMode::Unsigned => "unsigned".to_string(),
        };

        let mut lines = vec![
            format!("Engine: {}", self.engine),
            format!("Engine manager: {}", self.target),
            format!("Auth: {auth}"),
            String::new(),
            endpoints_table(&self.endpoints),
            String::new(),
            "Applied configuration:".to_string(),
        ];
        lines.extend(
            self.applied
                .iter()
                .map(|(key, value)| format!("  {key} = {value}")),
        );
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run the bootstrap and print the discovered endpoints.
pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let report = EngineBootstrap::new(config, BootstrapEnv::from_process(), CipherRegistry::new())
        .run()
        .await
        .context("Engine bootstrap failed")?;

    output(&DiscoverOutput::new(&report, config), json_mode);
    Ok(())
}
