//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console logs on stderr
//! - Configurable log levels (`--log-level`, `RUST_LOG`)
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use hl7diff::logging::init_logging;
//! use hl7diff::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a comparison run
///
/// # Example
///
/// ```no_run
/// use hl7diff::log_comparison_start;
///
/// log_comparison_start!("output.csv (csv)", "example.csv (csv)");
/// ```
#[macro_export]
macro_rules! log_comparison_start {
    ($output:expr, $example:expr) => {
        tracing::info!(
            output = %$output,
            example = %$example,
            "Starting comparison"
        );
    };
}

/// Log a record that was dropped because it could not be parsed
///
/// # Example
///
/// ```no_run
/// use hl7diff::log_record_parse_failure;
/// use hl7diff::domain::{ParseError, RecordSide};
///
/// log_record_parse_failure!(RecordSide::Output, 12, &ParseError::Empty);
/// ```
#[macro_export]
macro_rules! log_record_parse_failure {
    ($side:expr, $line:expr, $error:expr) => {
        tracing::warn!(
            side = %$side,
            line = $line,
            error = %$error,
            "Skipping unparsable record"
        );
    };
}

/// Log a correlated pair that produced mismatches
///
/// # Example
///
/// ```no_run
/// use hl7diff::log_pair_mismatch;
///
/// log_pair_mismatch!("123456", 3);
/// ```
#[macro_export]
macro_rules! log_pair_mismatch {
    ($key:expr, $count:expr) => {
        tracing::info!(
            patient_id = %$key,
            mismatches = $count,
            "Correlated pair does not match"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use hl7diff::log_error_with_context;
/// use hl7diff::domain::Hl7DiffError;
///
/// let error = Hl7DiffError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
