//! Application configuration tree.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Main configuration structure for engine bootstrap.
///
/// Mirrors the layout of the hosting framework's configuration file: the
/// `servicecomb` section holds current keys, the `cse` section the legacy
/// credential keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Current configuration namespace
    #[serde(default)]
    pub servicecomb: ServiceCombConfig,

    /// Legacy configuration namespace (credentials only)
    #[serde(default)]
    pub cse: LegacyConfig,

    /// Outbound HTTP transport configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The `servicecomb` configuration section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCombConfig {
    /// AK/SK credentials
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Service registry; `address` doubles as the registrator URI
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Configuration server client
    #[serde(default)]
    pub config: ConfigCenterConfig,

    /// Monitoring/dashboard client
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Engine discovery settings
    #[serde(default)]
    pub engine: EngineConfig,
}

/// The legacy `cse` configuration section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyConfig {
    /// AK/SK credentials under `cse.credentials.*`
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

/// AK/SK credential keys.
///
/// Every key is optional so an absent key can be told apart from an empty
/// one when falling back to the legacy namespace.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsConfig {
    /// Access key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Secret key, plaintext or ciphertext for `aksk_custom_cipher`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Project scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Name of the cipher plugin that decrypts `secret_key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aksk_custom_cipher: Option<String>,
}

impl CredentialsConfig {
    /// Merge with a legacy section: each key falls back to `legacy` only when
    /// absent here.
    pub fn or_legacy(&self, legacy: &Self) -> Self {
        Self {
            access_key: self.access_key.clone().or_else(|| legacy.access_key.clone()),
            secret_key: self.secret_key.clone().or_else(|| legacy.secret_key.clone()),
            project: self.project.clone().or_else(|| legacy.project.clone()),
            aksk_custom_cipher: self
                .aksk_custom_cipher
                .clone()
                .or_else(|| legacy.aksk_custom_cipher.clone()),
        }
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("project", &self.project)
            .field("aksk_custom_cipher", &self.aksk_custom_cipher)
            .finish()
    }
}

/// Service registry settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Registry address, e.g. `https://cse.cn-north-1.myhuaweicloud.com:443`
    #[serde(default)]
    pub address: String,
}

/// `servicecomb.config` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigCenterConfig {
    /// Config client settings
    #[serde(default)]
    pub client: ClientEndpointConfig,
}

/// `servicecomb.monitor` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Monitor client settings
    #[serde(default)]
    pub client: ClientEndpointConfig,
}

/// A client bound to a single server URI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientEndpointConfig {
    /// Server address
    #[serde(default)]
    pub server_uri: String,
}

/// Engine discovery settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Engine name to look up
    #[serde(default)]
    pub name: String,

    /// Region, used when the region environment variable is unset
    #[serde(default)]
    pub region: String,

    /// Domain of the per-region public endpoint
    #[serde(default = "default_engine_domain")]
    pub domain: String,

    /// Explicit engine-manager address; overrides the per-region endpoint
    #[serde(default)]
    pub manager_address: String,
}

fn default_engine_domain() -> String {
    "myhuaweicloud.com".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            region: String::new(),
            domain: default_engine_domain(),
            manager_address: String::new(),
        }
    }
}

/// Outbound HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Skip TLS certificate verification for the engine endpoint
    #[serde(default = "default_true")]
    pub insecure_skip_verify: bool,
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_true() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            insecure_skip_verify: default_true(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
