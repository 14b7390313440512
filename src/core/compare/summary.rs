//! Comparison summary and reporting
//!
//! This module defines the structure that tracks one comparison run and
//! renders it for people (text) and machines (JSON).

use crate::core::diff::{MismatchKind, MismatchReport};
use crate::domain::errors::RecordErrorDetail;
use crate::domain::ids::PatientId;
use crate::domain::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Summary of a comparison run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Unique identifier of the run
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Description of the output transcript
    pub output_source: String,

    /// Description of the example transcript
    pub example_source: String,

    /// Records loaded from the output transcript
    pub output_records: usize,

    /// Records loaded from the example transcript
    pub example_records: usize,

    /// Records dropped because they could not be parsed
    pub parse_failures: Vec<RecordErrorDetail>,

    /// Line numbers of output records without a correlation key
    pub keyless_output: Vec<usize>,

    /// Line numbers of example records without a correlation key
    pub keyless_example: Vec<usize>,

    /// Keys found only in the output transcript
    pub unmatched_output: Vec<PatientId>,

    /// Keys found only in the example transcript
    pub unmatched_example: Vec<PatientId>,

    /// Number of correlated pairs diffed
    pub pairs_compared: usize,

    /// Number of correlated pairs with at least one mismatch
    pub pairs_with_mismatches: usize,

    /// True when a shutdown signal stopped the run before every pair was diffed
    pub interrupted: bool,

    /// Duration of the run in milliseconds
    pub duration_ms: u64,

    /// Mismatches in reporting order
    pub mismatches: MismatchReport,
}

impl ComparisonSummary {
    /// Create a new empty summary for the given sources
    pub fn new(output_source: impl Into<String>, example_source: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            output_source: output_source.into(),
            example_source: example_source.into(),
            output_records: 0,
            example_records: 0,
            parse_failures: Vec::new(),
            keyless_output: Vec::new(),
            keyless_example: Vec::new(),
            unmatched_output: Vec::new(),
            unmatched_example: Vec::new(),
            pairs_compared: 0,
            pairs_with_mismatches: 0,
            interrupted: false,
            duration_ms: 0,
            mismatches: MismatchReport::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Record a record that failed to parse
    pub fn add_parse_failure(&mut self, failure: RecordErrorDetail) {
        self.parse_failures.push(failure);
    }

    /// Total number of mismatch entries
    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }

    /// True when every compared pair matched
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Number of distinct correlation keys with at least one mismatch
    pub fn mismatched_keys(&self) -> usize {
        let mut keys: Vec<Option<&PatientId>> = self
            .mismatches
            .entries()
            .iter()
            .map(|entry| entry.correlation_key.as_ref())
            .collect();
        keys.sort();
        keys.dedup();
        keys.len()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            output_records = self.output_records,
            example_records = self.example_records,
            pairs_compared = self.pairs_compared,
            pairs_with_mismatches = self.pairs_with_mismatches,
            mismatches = self.mismatch_count(),
            duration_ms = self.duration_ms,
            "Comparison completed"
        );

        if !self.parse_failures.is_empty() {
            tracing::warn!(
                count = self.parse_failures.len(),
                "Comparison completed with unparsable records"
            );
            for failure in &self.parse_failures {
                tracing::warn!(
                    side = %failure.side,
                    line = failure.line_number,
                    message = %failure.message,
                    "Unparsable record"
                );
            }
        }

        if !self.unmatched_output.is_empty() || !self.unmatched_example.is_empty() {
            tracing::warn!(
                output_only = self.unmatched_output.len(),
                example_only = self.unmatched_example.len(),
                "Some patient IDs have no counterpart"
            );
        }

        if self.interrupted {
            tracing::warn!("Comparison was interrupted; results are partial");
        }
    }

    /// Format the summary as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("📊 Comparison Summary\n");
        summary.push_str(&format!("  Run ID: {}\n", self.run_id));
        summary.push_str(&format!("  Started at: {}\n", self.started_at));
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        summary.push_str(&format!(
            "  Output: {} ({} records)\n",
            self.output_source, self.output_records
        ));
        summary.push_str(&format!(
            "  Example: {} ({} records)\n",
            self.example_source, self.example_records
        ));
        summary.push_str(&format!("  Pairs compared: {}\n", self.pairs_compared));
        summary.push_str(&format!(
            "  ✅ Matching pairs: {}\n",
            self.pairs_compared - self.pairs_with_mismatches.min(self.pairs_compared)
        ));
        summary.push_str(&format!(
            "  ❌ Pairs with mismatches: {}\n",
            self.pairs_with_mismatches
        ));
        summary.push_str(&format!(
            "  Mismatches: {} (value: {}, missing field: {}, unpaired segment: {})\n",
            self.mismatch_count(),
            self.mismatches.count_of(MismatchKind::Value),
            self.mismatches.count_of(MismatchKind::MissingField),
            self.mismatches.count_of(MismatchKind::UnpairedSegment),
        ));

        if !self.parse_failures.is_empty() {
            summary.push_str(&format!(
                "\n⚠️  Unparsable records: {}\n",
                self.parse_failures.len()
            ));
            for failure in &self.parse_failures {
                summary.push_str(&format!(
                    "  - {} record {}: {}\n",
                    failure.side, failure.line_number, failure.message
                ));
            }
        }

        if !self.keyless_output.is_empty() || !self.keyless_example.is_empty() {
            summary.push_str(&format!(
                "\n⚠️  Records without patient ID: output {}, example {}\n",
                self.keyless_output.len(),
                self.keyless_example.len()
            ));
        }

        if !self.unmatched_output.is_empty() {
            summary.push_str(&format!(
                "\n⏭️  Only in output: {}\n",
                join_keys(&self.unmatched_output)
            ));
        }
        if !self.unmatched_example.is_empty() {
            summary.push_str(&format!(
                "\n⏭️  Only in example: {}\n",
                join_keys(&self.unmatched_example)
            ));
        }

        if self.interrupted {
            summary.push_str("\n🛑 Interrupted before all pairs were compared\n");
        }

        summary
    }

    /// Renders the mismatch entries followed by the summary
    pub fn render_text(&self) -> String {
        if self.mismatches.is_empty() {
            return self.format_summary();
        }
        format!("{}\n\n{}", self.mismatches.render_text(), self.format_summary())
    }

    /// Serializes the whole run as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn join_keys(keys: &[PatientId]) -> String {
    keys.iter()
        .map(PatientId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
