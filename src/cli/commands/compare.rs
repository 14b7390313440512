//! Compare command implementation
//!
//! This module implements the `compare` command, which diffs an output
//! transcript against an example transcript and prints or writes the
//! mismatch report.

use crate::config::loader::{config_from_env, read_config, validate};
use crate::config::{Hl7DiffConfig, TranscriptConfig};
use crate::core::compare::{ComparisonCoordinator, ComparisonSummary};
use crate::domain::{Hl7DiffError, Result};
use crate::log_error_with_context;
use clap::Args;
use std::path::Path;
use tokio::sync::watch;

/// Arguments for the compare command
#[derive(Args, Debug, Default)]
pub struct CompareArgs {
    /// Override the output (actual) transcript path
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<String>,

    /// Override the example (expected) transcript path
    #[arg(long, value_name = "PATH")]
    pub example_file: Option<String>,

    /// Override the transcript format for both files (lines, csv, json)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Override the report format (text or json)
    #[arg(long)]
    pub report_format: Option<String>,

    /// Write the report to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub report_path: Option<String>,

    /// Override the extra segment policy (ignore or report)
    #[arg(long)]
    pub extra_segments: Option<String>,

    /// Override the missing field policy (ignore or report)
    #[arg(long)]
    pub missing_fields: Option<String>,

    /// Exit with code 0 even when mismatches are found
    #[arg(long)]
    pub no_fail: bool,
}

impl CompareArgs {
    /// Execute the compare command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting compare command");

        let config = match self.resolve_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Configuration validation failed");
                eprintln!("❌ {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let coordinator = match ComparisonCoordinator::new(&config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create comparison coordinator");
                eprintln!("❌ Failed to initialize comparison: {e}");
                return Ok(2);
            }
        };

        let summary = match coordinator.execute().await {
            Ok(s) => s,
            Err(e @ Hl7DiffError::Transcript(_)) => {
                tracing::error!(error = %e, "Failed to load transcripts");
                eprintln!("❌ {e}");
                return Ok(3); // Input error exit code
            }
            Err(e) => {
                log_error_with_context!(e, "Comparison failed");
                eprintln!("❌ Comparison failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let rendered = render_report(&summary, &config.report.format)?;
        match &config.report.output_path {
            Some(path) => {
                if let Err(e) = write_report(path, &rendered) {
                    log_error_with_context!(e, "Failed to write report");
                    eprintln!("❌ {e}");
                    return Ok(5); // Fatal error exit code
                }
                tracing::info!(path = %path, "Report written");
                eprintln!("✅ Report written to {path}");
            }
            None => println!("{rendered}"),
        }

        if summary.interrupted {
            eprintln!("⚠️  Comparison interrupted; the report is partial");
        }

        Ok(exit_code(&summary, config.report.fail_on_mismatch))
    }

    /// Loads the configuration file (or defaults when both transcripts are
    /// given on the command line), applies overrides and validates
    pub(crate) fn resolve_config(&self, config_path: &str) -> Result<Hl7DiffConfig> {
        let mut config = if Path::new(config_path).exists() {
            read_config(config_path)?
        } else if self.output_file.is_some() && self.example_file.is_some() {
            tracing::debug!(config_path = %config_path, "No configuration file, using defaults");
            config_from_env()?
        } else {
            return Err(Hl7DiffError::Configuration(format!(
                "Configuration file not found: {config_path} (pass --output-file and --example-file to run without one)"
            )));
        };

        self.apply_overrides(&mut config)?;
        validate(config)
    }

    fn apply_overrides(&self, config: &mut Hl7DiffConfig) -> Result<()> {
        let default_format = || self.format.clone().unwrap_or_else(|| "lines".to_string());

        if let Some(path) = &self.output_file {
            tracing::info!(path = %path, "Overriding output transcript from CLI");
            match config.input.output.as_mut() {
                Some(output) => output.path = path.clone(),
                None => {
                    config.input.output =
                        Some(TranscriptConfig::new(path.clone(), default_format()))
                }
            }
        }

        if let Some(path) = &self.example_file {
            tracing::info!(path = %path, "Overriding example transcript from CLI");
            match config.input.example.as_mut() {
                Some(example) => example.path = path.clone(),
                None => {
                    config.input.example =
                        Some(TranscriptConfig::new(path.clone(), default_format()))
                }
            }
        }

        if let Some(format) = &self.format {
            for transcript in [config.input.output.as_mut(), config.input.example.as_mut()]
                .into_iter()
                .flatten()
            {
                transcript.format = format.clone();
            }
        }

        if let Some(format) = &self.report_format {
            config.report.format = format.clone();
        }
        if let Some(path) = &self.report_path {
            config.report.output_path = Some(path.clone());
        }
        if let Some(policy) = &self.extra_segments {
            config.compare.extra_segments = policy.parse().map_err(Hl7DiffError::Configuration)?;
        }
        if let Some(policy) = &self.missing_fields {
            config.compare.missing_fields = policy.parse().map_err(Hl7DiffError::Configuration)?;
        }
        if self.no_fail {
            config.report.fail_on_mismatch = false;
        }

        Ok(())
    }
}

fn render_report(summary: &ComparisonSummary, format: &str) -> Result<String> {
    match format {
        "json" => summary.to_json(),
        _ => Ok(summary.render_text()),
    }
}

fn write_report(path: &str, rendered: &str) -> Result<()> {
    std::fs::write(path, rendered)
        .map_err(|e| Hl7DiffError::Report(format!("Failed to write report to {path}: {e}")))
}

fn exit_code(summary: &ComparisonSummary, fail_on_mismatch: bool) -> i32 {
    if fail_on_mismatch && !summary.is_clean() {
        1
    } else {
        0
    }
}
