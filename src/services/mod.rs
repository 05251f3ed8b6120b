//! Service layer
//!
//! Startup workflows composed from the domain ports and infrastructure
//! adapters.

pub mod bootstrap;

pub use bootstrap::{AuthMode, BootstrapError, BootstrapReport, EngineBootstrap};
