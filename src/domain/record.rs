//! Record domain model
//!
//! A record is one row of a transcript: the raw message text, its parsed
//! form, the segments grouped by the configured names, and the correlation
//! key derived from them. Records are read-only after construction.

use crate::domain::ids::PatientId;
use crate::hl7::{Message, SegmentGroups};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which transcript a record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSide {
    /// The actual transcript produced by the system under test
    Output,
    /// The expected transcript
    Example,
}

impl fmt::Display for RecordSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSide::Output => write!(f, "output"),
            RecordSide::Example => write!(f, "example"),
        }
    }
}

/// One parsed transcript row
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    side: RecordSide,
    line_number: usize,
    raw: String,
    message: Message,
    segments: SegmentGroups,
    correlation_key: Option<PatientId>,
}

impl Record {
    /// Assembles a record from its already-derived parts
    pub fn new(
        side: RecordSide,
        line_number: usize,
        raw: impl Into<String>,
        message: Message,
        segments: SegmentGroups,
        correlation_key: Option<PatientId>,
    ) -> Self {
        Self {
            side,
            line_number,
            raw: raw.into(),
            message,
            segments,
            correlation_key,
        }
    }

    pub fn side(&self) -> RecordSide {
        self.side
    }

    /// 1-based position of the record in its transcript
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Raw text as it appeared in the transcript, before re-segmentation
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Segments grouped by the configured segment names
    pub fn segments(&self) -> &SegmentGroups {
        &self.segments
    }

    /// Correlation key, absent when the identifying segment is missing or short
    pub fn correlation_key(&self) -> Option<&PatientId> {
        self.correlation_key.as_ref()
    }
}
