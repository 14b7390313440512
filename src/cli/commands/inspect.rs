//! Inspect command implementation
//!
//! This module implements the `inspect` command, which parses a single
//! transcript and shows what the comparison would see: each record's
//! correlation key and segment counts, plus any records that fail to parse.

use crate::adapters::transcript::{FileTranscriptSource, TranscriptFormat, TranscriptSource};
use crate::config::loader::{config_from_env, read_config};
use crate::config::Hl7DiffConfig;
use crate::core::compare::RecordBuilder;
use crate::domain::{Hl7DiffError, Record, RecordSide, Result};
use clap::Args;
use std::path::Path;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Transcript file to inspect
    pub file: String,

    /// Transcript format (lines, csv, json)
    #[arg(short, long, default_value = "lines")]
    pub format: String,

    /// Comma-separated segment names to extract (defaults to compare.segments)
    #[arg(long)]
    pub segments: Option<String>,
}

impl InspectArgs {
    /// Execute the inspect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(file = %self.file, format = %self.format, "Inspecting transcript");

        let builder = match self.record_builder(config_path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let format: TranscriptFormat = match self.format.parse() {
            Ok(f) => f,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let source = FileTranscriptSource::new(&self.file, format);
        let messages = match source.load().await {
            Ok(m) => m,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(3); // Input error exit code
            }
        };

        println!("🔍 Inspecting {}", source.describe());
        println!();

        let mut failures = 0;
        for (index, text) in messages.iter().enumerate() {
            let line_number = index + 1;
            match builder.build(RecordSide::Output, line_number, text) {
                Ok(record) => println!("{}", describe_record(&record)),
                Err(e) => {
                    failures += 1;
                    println!("  #{line_number}: ❌ {e}");
                }
            }
        }

        println!();
        println!("📊 {} records, {} unparsable", messages.len(), failures);
        Ok(0)
    }

    fn record_builder(&self, config_path: &str) -> Result<RecordBuilder> {
        let config = if Path::new(config_path).exists() {
            read_config(config_path)?
        } else {
            config_from_env()?
        };
        self.builder_from(&config)
    }

    fn builder_from(&self, config: &Hl7DiffConfig) -> Result<RecordBuilder> {
        let mut compare = config.compare.clone();
        if let Some(list) = &self.segments {
            compare.segments = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        RecordBuilder::from_config(&compare).map_err(Hl7DiffError::Configuration)
    }
}

fn describe_record(record: &Record) -> String {
    let key = record
        .correlation_key()
        .map_or_else(|| "<none>".to_string(), |k| k.to_string());
    let counts: Vec<String> = record
        .segments()
        .iter()
        .filter(|(_, segments)| !segments.is_empty())
        .map(|(name, segments)| format!("{name}x{}", segments.len()))
        .collect();

    format!(
        "  #{}: key {key} [{}]",
        record.line_number(),
        counts.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(file: &str, segments: Option<&str>) -> InspectArgs {
        InspectArgs {
            file: file.to_string(),
            format: "lines".to_string(),
            segments: segments.map(str::to_string),
        }
    }

    #[test]
    fn test_describe_record() {
        let builder = args("unused", Some("MSH,NK1"))
            .builder_from(&Hl7DiffConfig::default())
            .unwrap();
        let record = builder
            .build(
                RecordSide::Output,
                4,
                "MSH|^~\\&|A\rPID|1||123\rNK1|1|X\rNK1|2|Y",
            )
            .unwrap();

        let line = describe_record(&record);
        assert!(line.contains("#4"));
        assert!(line.contains("key 123"));
        assert!(line.contains("MSHx1"));
        assert!(line.contains("NK1x2"));
    }

    #[test]
    fn test_builder_rejects_bad_segment_name() {
        let result = args("unused", Some("MSH,pid")).builder_from(&Hl7DiffConfig::default());
        assert!(matches!(result, Err(Hl7DiffError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_inspect_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "MSH|^~\\&|A\rPID|1||123").unwrap();
        writeln!(file, "not a message").unwrap();
        file.flush().unwrap();

        let path = file.path().to_string_lossy().to_string();
        let code = args(&path, None)
            .execute("/nonexistent/hl7diff.toml")
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_inspect_missing_file() {
        let code = args("/nonexistent/transcript.txt", None)
            .execute("/nonexistent/hl7diff.toml")
            .await
            .unwrap();
        assert_eq!(code, 3);
    }
}
