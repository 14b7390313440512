// hl7diff - HL7 v2 Transcript Comparison Tool
// Copyright (c) 2025 hl7diff Contributors
// Licensed under the MIT License

//! # hl7diff - HL7 v2 Transcript Comparison
//!
//! hl7diff compares two transcripts of HL7 v2 messages: an *output*
//! transcript produced by a system under test and an *example* transcript
//! holding what it should have produced. Messages are paired by patient
//! identifier and compared field by field.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Re-segmenting** messages whose segment terminators were lost
//! - **Parsing** messages into segments, fields, components and repetitions
//! - **Correlating** output and example records by a configurable key (PID-3)
//! - **Diffing** correlated records with per-segment ignore rules
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Correlation, diff engine and comparison runs
//! - [`hl7`] - HL7 v2 splitting, parsing and segment extraction
//! - [`adapters`] - Transcript sources (files, memory)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use hl7diff::core::compare::RecordBuilder;
//! use hl7diff::core::diff::IgnoreRules;
//! use hl7diff::domain::{RecordSide, SegmentName};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let builder = RecordBuilder::new(vec![SegmentName::new("PID")?]);
//! let output = builder.build(RecordSide::Output, 1, "MSH|^~\\&|A\rPID|1||123||SMITH")?;
//! let example = builder.build(RecordSide::Example, 1, "MSH|^~\\&|A\rPID|1||123||SMYTH")?;
//!
//! assert_eq!(hl7diff::correlation_key(&output).map(|k| k.as_str()), Some("123"));
//!
//! let mismatches = hl7diff::diff(&output, &example, &IgnoreRules::new());
//! assert_eq!(mismatches.len(), 1);
//! assert_eq!(mismatches[0].field_index, 5);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Domain errors use [`domain::Hl7DiffError`]; the command layer wraps them
//! in `anyhow` and maps them to exit codes.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod hl7;
pub mod logging;

pub use crate::core::diff::diff;

use crate::domain::{PatientId, Record};

/// The correlation key resolved for `record`, if any
pub fn correlation_key(record: &Record) -> Option<&PatientId> {
    record.correlation_key()
}
