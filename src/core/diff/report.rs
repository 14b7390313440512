//! Mismatch report structures
//!
//! A mismatch report is an append-only list of entries produced by the diff
//! engine and consumed by the renderers.

use crate::domain::ids::{PatientId, SegmentName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of discrepancy an entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// Field present on both sides with different values
    Value,
    /// Field present on one side only
    MissingField,
    /// Segment occurrence present on one side only
    UnpairedSegment,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchKind::Value => write!(f, "value"),
            MismatchKind::MissingField => write!(f, "missing_field"),
            MismatchKind::UnpairedSegment => write!(f, "unpaired_segment"),
        }
    }
}

/// A single field-level discrepancy between an output and an example record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchEntry {
    /// Key of the correlated pair, when known
    pub correlation_key: Option<PatientId>,

    pub segment: SegmentName,

    /// 1-based occurrence of the segment within its record
    pub occurrence: usize,

    /// Field index (0 is the segment name)
    pub field_index: usize,

    pub kind: MismatchKind,

    /// Encoded value on the output side, `None` when absent
    pub output_value: Option<String>,

    /// Encoded value on the example side, `None` when absent
    pub example_value: Option<String>,
}

impl fmt::Display for MismatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self
            .correlation_key
            .as_ref()
            .map(PatientId::as_str)
            .unwrap_or("<none>");

        match self.kind {
            MismatchKind::Value | MismatchKind::MissingField => write!(
                f,
                "Patient ID {}: {} segment {} Field {} does not match.",
                key, self.segment, self.occurrence, self.field_index
            )?,
            MismatchKind::UnpairedSegment => write!(
                f,
                "Patient ID {}: {} segment {} has no counterpart.",
                key, self.segment, self.occurrence
            )?,
        }

        write!(
            f,
            "\nOutput:\n{}\nExample:\n{}",
            self.output_value.as_deref().unwrap_or("<absent>"),
            self.example_value.as_deref().unwrap_or("<absent>")
        )
    }
}

/// Ordered, append-only list of mismatch entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MismatchReport {
    entries: Vec<MismatchEntry>,
}

impl MismatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: MismatchEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = MismatchEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[MismatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of the given kind
    pub fn count_of(&self, kind: MismatchKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Renders every entry in the reference text form, separated by blank
    /// lines
    pub fn render_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl IntoIterator for MismatchReport {
    type Item = MismatchEntry;
    type IntoIter = std::vec::IntoIter<MismatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<Vec<MismatchEntry>> for MismatchReport {
    fn from(entries: Vec<MismatchEntry>) -> Self {
        Self { entries }
    }
}
