//! Configuration management for hl7diff.
//!
//! # Overview
//!
//! hl7diff uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `HL7DIFF_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation with descriptive errors
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hl7diff::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hl7diff.toml")?;
//! println!("Comparing segments: {}", config.compare.segments.join(", "));
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`InputConfig`] - Output and example transcripts ([`TranscriptConfig`])
//! - [`CompareConfig`] - Segments, policies, correlation and ignore rules
//! - [`ReportConfig`] - Report format and destination
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [input.output]
//! path = "${TRANSCRIPT_DIR}/output_messages.csv"
//! format = "csv"
//!
//! [input.example]
//! path = "${TRANSCRIPT_DIR}/example_messages.csv"
//! format = "csv"
//!
//! [compare]
//! segments = ["MSH", "PID", "NK1", "PV1"]
//!
//! [compare.ignore]
//! MSH = [7, 10]
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{config_from_env, load_config, read_config};
pub use schema::{
    ApplicationConfig, CompareConfig, CorrelationConfig, Hl7DiffConfig, InputConfig,
    LoggingConfig, ReportConfig, TranscriptConfig,
};
