//! Engine-manager API client
//!
//! Fetches the engine metadata document describing where the registry,
//! configuration server and dashboard of an engine live.

pub mod client;
pub mod error;

pub use client::{EngineClient, ENGINE_METADATA_PATH};
pub use error::EngineClientError;
