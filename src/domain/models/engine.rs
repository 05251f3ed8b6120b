//! Engine metadata returned by the engine manager, and the endpoints
//! selected from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::config::Config;

/// Key of the service registry in `PrivateEndpoint`.
pub const SERVICE_CENTER_KEY: &str = "serviceCenter";
/// Key of the configuration server in `PrivateEndpoint`.
pub const CONFIG_CENTER_KEY: &str = "configCenter";
/// Key of the dashboard service in `PrivateEndpoint`.
pub const DASHBOARD_SERVICE_KEY: &str = "dashboardService";

/// Response body of `GET /cseengine/v1/engine-metadata`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMetadataDocument {
    /// The engine metadata proper
    #[serde(rename = "CSE", default)]
    pub cse: EngineMetadata,
}

/// Addresses of an engine's sub-services, keyed by logical service name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineMetadata {
    /// Addresses reachable from inside the engine's network
    #[serde(rename = "PrivateEndpoint", default)]
    pub private_endpoint: HashMap<String, String>,

    /// Addresses reachable from the internet
    #[serde(rename = "PublicEndpoint", default)]
    pub public_endpoint: HashMap<String, String>,
}

impl EngineMetadata {
    /// Select the three private endpoints the framework consumes.
    ///
    /// Returns the name of the first missing key on failure.
    pub fn private_endpoints(&self) -> Result<EngineEndpoints, &'static str> {
        let pick = |key: &'static str| {
            self.private_endpoint
                .get(key)
                .filter(|addr| !addr.is_empty())
                .cloned()
                .ok_or(key)
        };

        Ok(EngineEndpoints {
            service_center: pick(SERVICE_CENTER_KEY)?,
            config_center: pick(CONFIG_CENTER_KEY)?,
            dashboard_service: pick(DASHBOARD_SERVICE_KEY)?,
        })
    }
}

/// Discovered addresses handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineEndpoints {
    /// Service registry, written to `servicecomb.registry.address`
    pub service_center: String,
    /// Configuration server, written to `servicecomb.config.client.serverUri`
    pub config_center: String,
    /// Dashboard, written to `servicecomb.monitor.client.serverUri`
    pub dashboard_service: String,
}

impl EngineEndpoints {
    /// Write the endpoints into `config`.
    ///
    /// Touches exactly the registry address, the config client server URI
    /// and the monitor client server URI.
    pub fn apply_to(&self, config: &mut Config) {
        config.servicecomb.registry.address.clone_from(&self.service_center);
        config
            .servicecomb
            .config
            .client
            .server_uri
            .clone_from(&self.config_center);
        config
            .servicecomb
            .monitor
            .client
            .server_uri
            .clone_from(&self.dashboard_service);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{"CSE":{"PrivateEndpoint":{"serviceCenter":"10.0.0.1:30100","configCenter":"10.0.0.1:30110","dashboardService":"10.0.0.1:30120"}}}"#;

    #[test]
    fn test_document_without_public_endpoint() {
        let doc: EngineMetadataDocument = serde_json::from_str(BODY).unwrap();
        assert!(doc.cse.public_endpoint.is_empty());
        assert_eq!(doc.cse.private_endpoint.len(), 3);
    }

    #[test]
    fn test_private_endpoints_selects_three_keys() {
        let doc: EngineMetadataDocument = serde_json::from_str(BODY).unwrap();
        let endpoints = doc.cse.private_endpoints().unwrap();
        assert_eq!(endpoints.service_center, "10.0.0.1:30100");
        assert_eq!(endpoints.config_center, "10.0.0.1:30110");
        assert_eq!(endpoints.dashboard_service, "10.0.0.1:30120");
    }

    #[test]
    fn test_private_endpoints_reports_missing_key() {
        let mut metadata = EngineMetadata::default();
        metadata
            .private_endpoint
            .insert(SERVICE_CENTER_KEY.to_string(), "10.0.0.1:30100".to_string());

        assert_eq!(metadata.private_endpoints(), Err(CONFIG_CENTER_KEY));
    }

    #[test]
    fn test_apply_to_changes_only_three_fields() {
        let mut config = Config::default();
        config.servicecomb.engine.name = "default".to_string();
        config.servicecomb.credentials.access_key = Some("ak".to_string());
        let before = config.clone();

        let endpoints = EngineEndpoints {
            service_center: "sc".to_string(),
            config_center: "cc".to_string(),
            dashboard_service: "ds".to_string(),
        };
        endpoints.apply_to(&mut config);

        assert_eq!(config.servicecomb.registry.address, "sc");
        assert_eq!(config.servicecomb.config.client.server_uri, "cc");
        assert_eq!(config.servicecomb.monitor.client.server_uri, "ds");

        let mut restored = config;
        restored.servicecomb.registry = before.servicecomb.registry.clone();
        restored.servicecomb.config = before.servicecomb.config.clone();
        restored.servicecomb.monitor = before.servicecomb.monitor.clone();
        assert_eq!(restored, before);
    }
}
