//! Configuration schema types
//!
//! This module defines the configuration structure for hl7diff.

use crate::adapters::transcript::TranscriptFormat;
use crate::core::correlation::{DEFAULT_KEY_FIELD, DEFAULT_KEY_SEGMENT};
use crate::core::diff::{DiffOptions, ExtraSegmentPolicy, IgnoreRules, MissingFieldPolicy};
use crate::domain::ids::SegmentName;
use crate::hl7::SegmentSplitter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Main hl7diff configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hl7DiffConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Transcript locations
    #[serde(default)]
    pub input: InputConfig,

    /// Comparison settings
    #[serde(default)]
    pub compare: CompareConfig,

    /// Report output settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Hl7DiffConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.input.validate()?;
        self.compare.validate()?;
        self.report.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Both transcripts of a comparison
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Transcript produced by the system under test
    #[serde(default)]
    pub output: Option<TranscriptConfig>,

    /// Expected transcript
    #[serde(default)]
    pub example: Option<TranscriptConfig>,
}

impl InputConfig {
    fn validate(&self) -> Result<(), String> {
        match &self.output {
            Some(output) => output.validate("input.output")?,
            None => return Err("input.output is required".to_string()),
        }
        match &self.example {
            Some(example) => example.validate("input.example")?,
            None => return Err("input.example is required".to_string()),
        }
        Ok(())
    }
}

/// Location and layout of one transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Path to the transcript file
    pub path: String,

    /// File layout (lines, csv, json)
    #[serde(default = "default_transcript_format")]
    pub format: String,
}

impl TranscriptConfig {
    pub fn new(path: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format: format.into(),
        }
    }

    fn validate(&self, section: &str) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err(format!("{section}.path cannot be empty"));
        }
        if TranscriptFormat::from_str(&self.format).is_err() {
            return Err(format!(
                "Invalid {}.format '{}'. Must be one of: {}",
                section,
                self.format,
                TranscriptFormat::ALL.join(", ")
            ));
        }
        Ok(())
    }
}

/// Comparison configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Segment names to compare, in reporting order
    #[serde(default = "default_segments")]
    pub segments: Vec<String>,

    /// Insert missing segment terminators before comparing
    #[serde(default = "default_true")]
    pub resegment: bool,

    /// Segment names recognized when restoring terminators. When unset, the
    /// standard HL7 v2 segment table plus any `Z` segment is recognized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchors: Option<Vec<String>>,

    /// Policy for repeated segments without a counterpart (ignore, report)
    #[serde(default)]
    pub extra_segments: ExtraSegmentPolicy,

    /// Policy for fields beyond the shorter segment (ignore, report)
    #[serde(default)]
    pub missing_fields: MissingFieldPolicy,

    /// Maximum number of correlated pairs diffed concurrently
    #[serde(default = "default_parallel_pairs")]
    pub parallel_pairs: usize,

    /// Where the correlation key is read from
    #[serde(default)]
    pub correlation: CorrelationConfig,

    /// Field indices excluded from comparison, keyed by segment name
    #[serde(default = "default_ignore")]
    pub ignore: HashMap<String, Vec<usize>>,
}

impl CompareConfig {
    fn validate(&self) -> Result<(), String> {
        if self.segments.is_empty() {
            return Err("compare.segments cannot be empty".to_string());
        }
        for name in &self.segments {
            SegmentName::new(name.as_str()).map_err(|e| format!("compare.segments: {e}"))?;
        }

        if self.parallel_pairs == 0 || self.parallel_pairs > 64 {
            return Err(format!(
                "compare.parallel_pairs must be between 1 and 64, got {}",
                self.parallel_pairs
            ));
        }

        if let Some(anchors) = &self.anchors {
            if anchors.is_empty() {
                return Err("compare.anchors cannot be empty when set".to_string());
            }
        }
        self.splitter()?;

        self.correlation.validate()?;
        IgnoreRules::from_table(&self.ignore)?;
        Ok(())
    }

    /// Splitter recognizing `compare.anchors`, or the standard segment table
    /// when unset
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid anchor
    pub fn splitter(&self) -> Result<SegmentSplitter, String> {
        match &self.anchors {
            Some(anchors) => {
                let names = anchors
                    .iter()
                    .map(|name| SegmentName::new(name.as_str()))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| format!("compare.anchors: {e}"))?;
                Ok(SegmentSplitter::new(names))
            }
            None => Ok(SegmentSplitter::standard()),
        }
    }

    /// Segment names in configured order
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid segment name
    pub fn segment_names(&self) -> Result<Vec<SegmentName>, String> {
        self.segments
            .iter()
            .map(|name| SegmentName::new(name.as_str()))
            .collect()
    }

    /// Ignore rules built from the `[compare.ignore]` table
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid segment name
    pub fn ignore_rules(&self) -> Result<IgnoreRules, String> {
        IgnoreRules::from_table(&self.ignore)
    }

    pub fn diff_options(&self) -> DiffOptions {
        DiffOptions {
            extra_segments: self.extra_segments,
            missing_fields: self.missing_fields,
        }
    }
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            resegment: true,
            anchors: None,
            extra_segments: ExtraSegmentPolicy::default(),
            missing_fields: MissingFieldPolicy::default(),
            parallel_pairs: default_parallel_pairs(),
            correlation: CorrelationConfig::default(),
            ignore: default_ignore(),
        }
    }
}

/// Correlation key location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Identifying segment
    #[serde(default = "default_key_segment")]
    pub segment: String,

    /// Identifying field index
    #[serde(default = "default_key_field")]
    pub field: usize,
}

impl CorrelationConfig {
    fn validate(&self) -> Result<(), String> {
        SegmentName::new(self.segment.as_str())
            .map_err(|e| format!("compare.correlation.segment: {e}"))?;
        if self.field == 0 {
            return Err("compare.correlation.field must be >= 1".to_string());
        }
        Ok(())
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            segment: default_key_segment(),
            field: default_key_field(),
        }
    }
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report format (text or json)
    #[serde(default = "default_report_format")]
    pub format: String,

    /// Write the report to this file instead of stdout
    #[serde(default)]
    pub output_path: Option<String>,

    /// Exit with a non-zero code when mismatches are found
    #[serde(default = "default_true")]
    pub fail_on_mismatch: bool,
}

impl ReportConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(format!(
                "Invalid report.format '{}'. Must be one of: {}",
                self.format,
                valid_formats.join(", ")
            ));
        }
        if let Some(path) = &self.output_path {
            if path.trim().is_empty() {
                return Err("report.output_path cannot be empty when set".to_string());
            }
        }
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: default_report_format(),
            output_path: None,
            fail_on_mismatch: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_transcript_format() -> String {
    "lines".to_string()
}

fn default_segments() -> Vec<String> {
    [
        "MSH", "EVN", "PID", "PD1", "NK1", "PV1", "PV2", "ORC", "OBR", "OBX", "NTE", "AL1", "DG1",
        "IN1",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_parallel_pairs() -> usize {
    8
}

fn default_key_segment() -> String {
    DEFAULT_KEY_SEGMENT.to_string()
}

fn default_key_field() -> usize {
    DEFAULT_KEY_FIELD
}

/// Timestamps and generated identifiers that differ between every run
fn default_ignore() -> HashMap<String, Vec<usize>> {
    HashMap::from([
        ("MSH".to_string(), vec![7, 10]),
        ("EVN".to_string(), vec![2, 6]),
        ("OBR".to_string(), vec![7, 22]),
        ("OBX".to_string(), vec![14, 19]),
    ])
}

fn default_report_format() -> String {
    "text".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
