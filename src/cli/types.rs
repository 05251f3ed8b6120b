//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level command line
#[derive(Parser, Debug)]
#[command(name = "engine-bootstrap")]
#[command(about = "Discover service-mesh engine endpoints with AK/SK credentials", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to conf/chassis.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Resolve credentials, query the engine manager and print the endpoints
    Discover,

    /// Resolve credentials only and print where they came from
    Credentials,
}
