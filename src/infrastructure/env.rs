//! Environment variables read at bootstrap.
//!
//! The process environment is captured once into [`BootstrapEnv`]; the rest
//! of the crate reads from that snapshot.

use std::path::PathBuf;

/// Directory holding `certificate.yaml`.
pub const CIPHER_ROOT_ENV: &str = "CIPHER_ROOT";
/// Project override, highest precedence.
pub const PROJECT_NAME_ENV: &str = "PAAS_PROJECT_NAME";
/// Region of the per-region engine endpoint.
pub const REGION_ENV: &str = "PAAS_CSE_REGION";
/// Explicit engine-manager address.
pub const ENGINE_MANAGER_ADDR_ENV: &str = "CSE_ENGINE_MANAGER_ADDR";

/// Snapshot of the bootstrap environment variables. Empty values count as
/// unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapEnv {
    /// `CIPHER_ROOT`
    pub cipher_root: Option<PathBuf>,
    /// `PAAS_PROJECT_NAME`
    pub project_name: Option<String>,
    /// `PAAS_CSE_REGION`
    pub region: Option<String>,
    /// `CSE_ENGINE_MANAGER_ADDR`
    pub engine_manager_addr: Option<String>,
}

impl BootstrapEnv {
    /// Read the variables from the current process environment.
    pub fn from_process() -> Self {
        Self {
            cipher_root: non_empty(CIPHER_ROOT_ENV).map(PathBuf::from),
            project_name: non_empty(PROJECT_NAME_ENV),
            region: non_empty(REGION_ENV),
            engine_manager_addr: non_empty(ENGINE_MANAGER_ADDR_ENV),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
