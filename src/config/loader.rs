//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::Hl7DiffConfig;
use crate::domain::errors::Hl7DiffError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads and validates configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into Hl7DiffConfig
/// 4. Applies environment variable overrides (HL7DIFF_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use hl7diff::config::loader::load_config;
///
/// let config = load_config("hl7diff.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<Hl7DiffConfig> {
    let config = read_config(path)?;
    validate(config)
}

/// Loads configuration without validating it, so callers can apply command
/// line overrides first
///
/// # Errors
///
/// Returns an error if the file cannot be read, substituted or parsed
pub fn read_config(path: impl AsRef<Path>) -> Result<Hl7DiffConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Hl7DiffError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        Hl7DiffError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration text, applying `${VAR}` substitution and
/// `HL7DIFF_*` overrides
///
/// # Errors
///
/// Returns an error if substitution or TOML parsing fails
pub fn parse_config(contents: &str) -> Result<Hl7DiffConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: Hl7DiffConfig = toml::from_str(&contents)
        .map_err(|e| Hl7DiffError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Built-in defaults with `HL7DIFF_*` overrides applied, for runs without a
/// configuration file
///
/// # Errors
///
/// Returns an error if an override cannot be applied
pub fn config_from_env() -> Result<Hl7DiffConfig> {
    let mut config = Hl7DiffConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Validates a configuration, wrapping failures as configuration errors
///
/// # Errors
///
/// Returns the first validation failure
pub fn validate(config: Hl7DiffConfig) -> Result<Hl7DiffConfig> {
    config.validate().map_err(|e| {
        Hl7DiffError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| Hl7DiffError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Placeholders in comments are left alone
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(Hl7DiffError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using HL7DIFF_* prefix
///
/// Environment variables follow the pattern: HL7DIFF_<SECTION>_<KEY>
/// For example: HL7DIFF_INPUT_OUTPUT_PATH, HL7DIFF_REPORT_FORMAT
fn apply_env_overrides(config: &mut Hl7DiffConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("HL7DIFF_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Input overrides
    override_transcript(
        &mut config.input.output,
        "HL7DIFF_INPUT_OUTPUT_PATH",
        "HL7DIFF_INPUT_OUTPUT_FORMAT",
    );
    override_transcript(
        &mut config.input.example,
        "HL7DIFF_INPUT_EXAMPLE_PATH",
        "HL7DIFF_INPUT_EXAMPLE_FORMAT",
    );

    // Compare overrides
    if let Ok(val) = std::env::var("HL7DIFF_COMPARE_SEGMENTS") {
        config.compare.segments = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(val) = std::env::var("HL7DIFF_COMPARE_RESEGMENT") {
        config.compare.resegment = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("HL7DIFF_COMPARE_EXTRA_SEGMENTS") {
        config.compare.extra_segments = val.parse().map_err(Hl7DiffError::Configuration)?;
    }
    if let Ok(val) = std::env::var("HL7DIFF_COMPARE_MISSING_FIELDS") {
        config.compare.missing_fields = val.parse().map_err(Hl7DiffError::Configuration)?;
    }
    if let Ok(val) = std::env::var("HL7DIFF_COMPARE_PARALLEL_PAIRS") {
        if let Ok(parallel) = val.parse() {
            config.compare.parallel_pairs = parallel;
        }
    }

    // Report overrides
    if let Ok(val) = std::env::var("HL7DIFF_REPORT_FORMAT") {
        config.report.format = val;
    }
    if let Ok(val) = std::env::var("HL7DIFF_REPORT_OUTPUT_PATH") {
        config.report.output_path = Some(val);
    }
    if let Ok(val) = std::env::var("HL7DIFF_REPORT_FAIL_ON_MISMATCH") {
        config.report.fail_on_mismatch = val.parse().unwrap_or(true);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("HL7DIFF_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("HL7DIFF_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

fn override_transcript(
    slot: &mut Option<super::schema::TranscriptConfig>,
    path_var: &str,
    format_var: &str,
) {
    if let Ok(path) = std::env::var(path_var) {
        match slot {
            Some(transcript) => transcript.path = path,
            None => *slot = Some(super::schema::TranscriptConfig::new(path, "lines")),
        }
    }
    if let (Ok(format), Some(transcript)) = (std::env::var(format_var), slot.as_mut()) {
        transcript.format = format;
    }
}
