//! Infrastructure layer module
//!
//! Adapters and external integrations used by the bootstrap:
//! - Configuration management (figment)
//! - Logging infrastructure
//! - Environment snapshot
//! - Credential resolution
//! - Request signing
//! - HTTP transport and the engine-manager client
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod credentials;
pub mod engine;
pub mod env;
pub mod http;
pub mod logging;
pub mod signing;
