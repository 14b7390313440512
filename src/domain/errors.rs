//! Domain error types
//!
//! This module defines the error hierarchy for hl7diff. Parse failures are
//! scoped to a single record, transcript failures to a whole run. Missing
//! correlation keys and short segments are deliberately not errors.

use crate::domain::record::RecordSide;
use thiserror::Error;

/// Main hl7diff error type
///
/// This is the primary error type used throughout the library. It wraps the
/// specific error types and provides context for the CLI layer.
#[derive(Debug, Error)]
pub enum Hl7DiffError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A single message could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A transcript could not be loaded
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Report rendering or writing errors
    #[error("Report error: {0}")]
    Report(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while turning raw message text into a structured message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The message text is empty or whitespace only
    #[error("message is empty")]
    Empty,

    /// No line of the message starts with a recognizable segment name
    #[error("no recognizable segments in message starting with {preview:?}")]
    NoSegments { preview: String },
}

impl ParseError {
    /// Builds a `NoSegments` error carrying the first characters of the input
    pub fn no_segments(text: &str) -> Self {
        ParseError::NoSegments {
            preview: text.chars().take(24).collect(),
        }
    }
}

/// Errors raised by transcript sources
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Transcript file does not exist
    #[error("Transcript not found: {0}")]
    NotFound(String),

    /// Transcript file could not be read
    #[error("Failed to read transcript {path}: {message}")]
    Read { path: String, message: String },

    /// Transcript content does not match its declared format
    #[error("Malformed transcript {path} at line {line}: {message}")]
    Malformed {
        path: String,
        line: usize,
        message: String,
    },

    /// Unknown transcript format name
    #[error("Unsupported transcript format: {0}")]
    UnsupportedFormat(String),
}

/// Details of a record that was dropped before correlation
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordErrorDetail {
    /// Which transcript the record came from
    pub side: RecordSide,

    /// 1-based position of the record in its transcript
    pub line_number: usize,

    /// Error message
    pub message: String,
}

impl RecordErrorDetail {
    /// Creates a new record error detail
    pub fn new(side: RecordSide, line_number: usize, message: impl Into<String>) -> Self {
        Self {
            side,
            line_number,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for Hl7DiffError {
    fn from(err: std::io::Error) -> Self {
        Hl7DiffError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Hl7DiffError {
    fn from(err: serde_json::Error) -> Self {
        Hl7DiffError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Hl7DiffError {
    fn from(err: toml::de::Error) -> Self {
        Hl7DiffError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Hl7DiffError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: Hl7DiffError = ParseError::Empty.into();
        assert!(matches!(err, Hl7DiffError::Parse(ParseError::Empty)));
        assert_eq!(err.to_string(), "Parse error: message is empty");
    }

    #[test]
    fn test_no_segments_preview_is_truncated() {
        let text = "x".repeat(100);
        match ParseError::no_segments(&text) {
            ParseError::NoSegments { preview } => assert_eq!(preview.len(), 24),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_transcript_error_conversion() {
        let err: Hl7DiffError = TranscriptError::NotFound("out.csv".to_string()).into();
        assert!(matches!(err, Hl7DiffError::Transcript(_)));
        assert!(err.to_string().contains("out.csv"));
    }

    #[test]
    fn test_record_error_detail() {
        let detail = RecordErrorDetail::new(RecordSide::Example, 7, "message is empty");
        assert_eq!(detail.side, RecordSide::Example);
        assert_eq!(detail.line_number, 7);
        assert_eq!(detail.message, "message is empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: Hl7DiffError = io_err.into();
        assert!(matches!(err, Hl7DiffError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: Hl7DiffError = toml_err.into();
        assert!(matches!(err, Hl7DiffError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
