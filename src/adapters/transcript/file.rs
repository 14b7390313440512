//! File-backed transcript source
//!
//! Supported layouts:
//! - `lines`: one message per line; segments inside a message are separated
//!   by `\r`. Blank lines are skipped.
//! - `csv`: single-column CSV without a header, read with the `csv` crate.
//!   Quoted fields may contain commas, newlines and doubled quotes. Rows end
//!   at `\n` only, so unquoted `\r` segment terminators stay in the message.
//!   Extra columns are ignored.
//! - `json`: a JSON array of message strings.

use super::traits::TranscriptSource;
use crate::domain::errors::TranscriptError;
use crate::domain::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// On-disk layout of a transcript file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    #[default]
    Lines,
    Csv,
    Json,
}

impl TranscriptFormat {
    pub const ALL: [&'static str; 3] = ["lines", "csv", "json"];
}

impl FromStr for TranscriptFormat {
    type Err = TranscriptError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" => Ok(TranscriptFormat::Lines),
            "csv" => Ok(TranscriptFormat::Csv),
            "json" => Ok(TranscriptFormat::Json),
            other => Err(TranscriptError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptFormat::Lines => write!(f, "lines"),
            TranscriptFormat::Csv => write!(f, "csv"),
            TranscriptFormat::Json => write!(f, "json"),
        }
    }
}

/// Reads a transcript from a local file
#[derive(Debug, Clone)]
pub struct FileTranscriptSource {
    path: PathBuf,
    format: TranscriptFormat,
}

impl FileTranscriptSource {
    pub fn new(path: impl Into<PathBuf>, format: TranscriptFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> TranscriptFormat {
        self.format
    }
}

#[async_trait]
impl TranscriptSource for FileTranscriptSource {
    async fn load(&self) -> Result<Vec<String>> {
        let origin = self.path.display().to_string();

        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(TranscriptError::NotFound(origin).into());
        }

        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|e| TranscriptError::Read {
                    path: origin.clone(),
                    message: e.to_string(),
                })?;

        let messages = parse_transcript(&contents, self.format, &origin)?;

        tracing::debug!(
            path = %origin,
            format = %self.format,
            records = messages.len(),
            "Loaded transcript"
        );

        Ok(messages)
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.path.display(), self.format)
    }
}

/// Splits transcript file contents into raw messages
///
/// # Errors
///
/// Returns [`TranscriptError::Malformed`] for unreadable CSV or invalid
/// JSON.
pub fn parse_transcript(
    contents: &str,
    format: TranscriptFormat,
    origin: &str,
) -> std::result::Result<Vec<String>, TranscriptError> {
    match format {
        TranscriptFormat::Lines => Ok(parse_lines(contents)),
        TranscriptFormat::Csv => parse_csv(contents, origin),
        TranscriptFormat::Json => parse_json(contents, origin),
    }
}

fn parse_lines(contents: &str) -> Vec<String> {
    contents
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_csv(contents: &str, origin: &str) -> std::result::Result<Vec<String>, TranscriptError> {
    // Only `\n` ends a row; an unquoted `\r` is an HL7 segment terminator
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_reader(contents.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| TranscriptError::Malformed {
            path: origin.to_string(),
            line: e.position().map_or(0, |p| p.line() as usize),
            message: e.to_string(),
        })?;

        if record.len() > 1 {
            tracing::debug!(
                line = record.position().map_or(0, |p| p.line()),
                columns = record.len(),
                "Ignoring extra CSV columns"
            );
        }

        let first = record.get(0).unwrap_or_default();
        let first = match record.len() {
            1 => first.strip_suffix('\r').unwrap_or(first),
            _ => first,
        };
        if !first.trim().is_empty() {
            rows.push(first.to_string());
        }
    }

    Ok(rows)
}

fn parse_json(contents: &str, origin: &str) -> std::result::Result<Vec<String>, TranscriptError> {
    serde_json::from_str::<Vec<String>>(contents).map_err(|e| TranscriptError::Malformed {
        path: origin.to_string(),
        line: e.line(),
        message: e.to_string(),
    })
}
