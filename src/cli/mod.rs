//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for hl7diff using clap.

pub mod commands;

use crate::config::loader::{config_from_env, read_config};
use crate::config::LoggingConfig;
use crate::logging::structured::parse_log_level;
use clap::{Parser, Subcommand};
use std::path::Path;

/// hl7diff - HL7 v2 transcript comparison tool
#[derive(Parser, Debug)]
#[command(name = "hl7diff")]
#[command(version, about, long_about = None)]
#[command(author = "hl7diff Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "hl7diff.toml", env = "HL7DIFF_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HL7DIFF_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level and `[logging]` settings for this run
    ///
    /// `--log-level` wins over `[application] log_level`. An unreadable
    /// configuration file or an unknown level falls back to console logging
    /// at `info`; the command itself reports configuration problems.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let config = if Path::new(&self.config).exists() {
            read_config(&self.config)
        } else {
            config_from_env()
        };
        let (level, logging) = match config {
            Ok(c) => (Some(c.application.log_level), c.logging),
            Err(_) => (None, LoggingConfig::default()),
        };

        let level = self
            .log_level
            .clone()
            .or(level)
            .filter(|l| parse_log_level(l).is_ok())
            .unwrap_or_else(|| "info".to_string());
        (level, logging)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare an output transcript against an example transcript
    Compare(commands::compare::CompareArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Show how a transcript's records are parsed and keyed
    Inspect(commands::inspect::InspectArgs),
}
