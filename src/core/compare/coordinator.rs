//! Comparison coordinator - orchestrates a full comparison run
//!
//! Loads both transcripts, builds records, correlates them and diffs every
//! correlated pair. Pairs are diffed on blocking worker threads in chunks of
//! at most `compare.parallel_pairs`; results are collected in pair order so
//! the report is identical to a sequential run.

use crate::adapters::transcript::{create_transcript_source, TranscriptSource};
use crate::config::Hl7DiffConfig;
use crate::core::compare::records::RecordBuilder;
use crate::core::compare::summary::ComparisonSummary;
use crate::core::correlation::{correlate, CorrelatedPair};
use crate::core::diff::{DiffEngine, MismatchEntry};
use crate::domain::errors::RecordErrorDetail;
use crate::domain::record::{Record, RecordSide};
use crate::domain::{Hl7DiffError, Result};
use crate::{log_comparison_start, log_pair_mismatch, log_record_parse_failure};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Comparison coordinator
pub struct ComparisonCoordinator {
    output: Arc<dyn TranscriptSource + Send + Sync>,
    example: Arc<dyn TranscriptSource + Send + Sync>,
    builder: RecordBuilder,
    engine: Arc<DiffEngine>,
    parallel_pairs: usize,
    shutdown_signal: watch::Receiver<bool>,
}

impl ComparisonCoordinator {
    /// Create a coordinator reading the transcripts named in `config`
    ///
    /// # Errors
    ///
    /// Returns an error if an input section is missing or invalid
    pub fn new(config: &Hl7DiffConfig, shutdown_signal: watch::Receiver<bool>) -> Result<Self> {
        let output = config
            .input
            .output
            .as_ref()
            .ok_or_else(|| Hl7DiffError::Configuration("input.output is required".to_string()))?;
        let example = config
            .input
            .example
            .as_ref()
            .ok_or_else(|| Hl7DiffError::Configuration("input.example is required".to_string()))?;

        Self::with_sources(
            config,
            create_transcript_source(output)?,
            create_transcript_source(example)?,
            shutdown_signal,
        )
    }

    /// Create a coordinator over explicit transcript sources; the `[input]`
    /// section of `config` is not used
    ///
    /// # Errors
    ///
    /// Returns an error if the comparison settings are invalid
    pub fn with_sources(
        config: &Hl7DiffConfig,
        output: Arc<dyn TranscriptSource + Send + Sync>,
        example: Arc<dyn TranscriptSource + Send + Sync>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Result<Self> {
        let compare = &config.compare;
        let segments = compare
            .segment_names()
            .map_err(Hl7DiffError::Configuration)?;
        let rules = compare.ignore_rules().map_err(Hl7DiffError::Configuration)?;
        let builder = RecordBuilder::from_config(compare).map_err(Hl7DiffError::Configuration)?;
        let engine = DiffEngine::new(segments, rules, compare.diff_options());

        Ok(Self {
            output,
            example,
            builder,
            engine: Arc::new(engine),
            parallel_pairs: compare.parallel_pairs.max(1),
            shutdown_signal,
        })
    }

    /// Execute the comparison
    ///
    /// Unparsable records, records without a key and unmatched keys are
    /// reported in the summary and never abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error if a transcript cannot be loaded or a worker panics
    pub async fn execute(&self) -> Result<ComparisonSummary> {
        let start_time = Instant::now();
        let mut summary = ComparisonSummary::new(self.output.describe(), self.example.describe());

        log_comparison_start!(summary.output_source, summary.example_source);

        let (output_raw, example_raw) = tokio::try_join!(self.output.load(), self.example.load())?;
        summary.output_records = output_raw.len();
        summary.example_records = example_raw.len();

        let outputs = self.build_records(RecordSide::Output, &output_raw, &mut summary);
        let examples = self.build_records(RecordSide::Example, &example_raw, &mut summary);

        let correlation = correlate(&outputs, &examples);
        tracing::info!(
            pairs = correlation.pairs.len(),
            matched_keys = correlation.matched_keys(),
            output_only = correlation.unmatched_output.len(),
            example_only = correlation.unmatched_example.len(),
            "Correlated records"
        );

        summary.keyless_output = correlation.keyless_output;
        summary.keyless_example = correlation.keyless_example;
        summary.unmatched_output = correlation.unmatched_output;
        summary.unmatched_example = correlation.unmatched_example;

        self.diff_pairs(correlation.pairs, outputs, examples, &mut summary)
            .await?;

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }

    fn build_records(
        &self,
        side: RecordSide,
        raw: &[String],
        summary: &mut ComparisonSummary,
    ) -> Vec<Record> {
        let mut records = Vec::with_capacity(raw.len());
        for (index, text) in raw.iter().enumerate() {
            let line_number = index + 1;
            match self.builder.build(side, line_number, text) {
                Ok(record) => records.push(record),
                Err(e) => {
                    log_record_parse_failure!(side, line_number, e);
                    summary.add_parse_failure(RecordErrorDetail::new(
                        side,
                        line_number,
                        e.to_string(),
                    ));
                }
            }
        }
        records
    }

    async fn diff_pairs(
        &self,
        pairs: Vec<CorrelatedPair>,
        outputs: Vec<Record>,
        examples: Vec<Record>,
        summary: &mut ComparisonSummary,
    ) -> Result<()> {
        let outputs = Arc::new(outputs);
        let examples = Arc::new(examples);
        let total = pairs.len();

        for (chunk_index, chunk) in pairs.chunks(self.parallel_pairs).enumerate() {
            if *self.shutdown_signal.borrow() {
                tracing::warn!(
                    compared = summary.pairs_compared,
                    total,
                    "Shutdown requested, stopping comparison"
                );
                summary.interrupted = true;
                break;
            }

            tracing::debug!(
                chunk = chunk_index + 1,
                compared = summary.pairs_compared,
                total,
                "Diffing chunk of correlated pairs"
            );

            let handles: Vec<_> = chunk
                .iter()
                .map(|pair| {
                    let engine = Arc::clone(&self.engine);
                    let outputs = Arc::clone(&outputs);
                    let examples = Arc::clone(&examples);
                    let (output_index, example_index) = (pair.output_index, pair.example_index);
                    tokio::task::spawn_blocking(move || -> Vec<MismatchEntry> {
                        engine.diff(&outputs[output_index], &examples[example_index])
                    })
                })
                .collect();

            for (pair, handle) in chunk.iter().zip(handles) {
                let entries = handle
                    .await
                    .map_err(|e| Hl7DiffError::Other(format!("Diff worker failed: {e}")))?;

                summary.pairs_compared += 1;
                if !entries.is_empty() {
                    summary.pairs_with_mismatches += 1;
                    log_pair_mismatch!(pair.key, entries.len());
                }
                summary.mismatches.extend(entries);
            }
        }

        Ok(())
    }
}
