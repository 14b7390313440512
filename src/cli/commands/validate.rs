//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the hl7diff configuration file.

use crate::config::loader::{read_config, validate};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match read_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let config = match validate(config) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        for (label, transcript) in [
            ("Output", &config.input.output),
            ("Example", &config.input.example),
        ] {
            if let Some(transcript) = transcript {
                println!(
                    "  {label} Transcript: {} ({})",
                    transcript.path, transcript.format
                );
            }
        }
        println!("  Segments: {}", config.compare.segments.join(", "));
        println!(
            "  Correlation Key: {}.{}",
            config.compare.correlation.segment, config.compare.correlation.field
        );
        println!("  Re-segment: {}", config.compare.resegment);
        println!("  Extra Segments: {}", config.compare.extra_segments);
        println!("  Missing Fields: {}", config.compare.missing_fields);
        println!("  Parallel Pairs: {}", config.compare.parallel_pairs);

        let mut ignored: Vec<_> = config.compare.ignore.iter().collect();
        ignored.sort();
        for (segment, fields) in ignored {
            println!("  Ignore {segment}: {fields:?}");
        }

        println!("  Report Format: {}", config.report.format);
        if let Some(path) = &config.report.output_path {
            println!("  Report Path: {path}");
        }
        println!();
        Ok(0)
    }
}
