//! Record construction
//!
//! Runs one raw transcript entry through the leaf pipeline: re-segmentation,
//! parsing, extraction and key resolution.

use crate::config::CompareConfig;
use crate::core::correlation::CorrelationKeyResolver;
use crate::domain::errors::ParseError;
use crate::domain::ids::SegmentName;
use crate::domain::record::{Record, RecordSide};
use crate::hl7::{extract_segments, parse_message, EncodingCharacters, SegmentSplitter};
use std::borrow::Cow;

/// Builds [`Record`] values from raw message text
///
/// The splitter's recognized names are independent of the tracked segments:
/// narrowing the tracked list never changes how a message is split.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    segments: Vec<SegmentName>,
    splitter: SegmentSplitter,
    resolver: CorrelationKeyResolver,
    resegment: bool,
}

impl RecordBuilder {
    /// Creates a builder tracking `segments`, with the default PID.3
    /// correlation key, the standard segment table for re-segmentation and
    /// re-segmentation enabled
    pub fn new(segments: Vec<SegmentName>) -> Self {
        let resolver = CorrelationKeyResolver::default();
        let segments = tracked(segments, &resolver);
        Self {
            splitter: SegmentSplitter::standard().with_anchors(segments.clone()),
            segments,
            resolver,
            resegment: true,
        }
    }

    /// Builds the record pipeline described by a `[compare]` section
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid segment name
    pub fn from_config(compare: &CompareConfig) -> Result<Self, String> {
        let key_segment = SegmentName::new(compare.correlation.segment.as_str())
            .map_err(|e| format!("compare.correlation.segment: {e}"))?;

        let resolver = CorrelationKeyResolver::new(key_segment, compare.correlation.field);
        let segments = tracked(compare.segment_names()?, &resolver);

        Ok(Self {
            splitter: compare.splitter()?.with_anchors(segments.clone()),
            segments,
            resolver,
            resegment: compare.resegment,
        })
    }

    /// Reads the correlation key from a different segment/field
    pub fn with_resolver(mut self, resolver: CorrelationKeyResolver) -> Self {
        self.segments = tracked(self.segments, &resolver);
        self.splitter = self.splitter.with_anchors(self.segments.clone());
        self.resolver = resolver;
        self
    }

    /// Replaces the re-segmentation splitter; tracked names stay recognized
    pub fn with_splitter(mut self, splitter: SegmentSplitter) -> Self {
        self.splitter = splitter.with_anchors(self.segments.clone());
        self
    }

    /// Enables or disables terminator repair
    pub fn with_resegment(mut self, resegment: bool) -> Self {
        self.resegment = resegment;
        self
    }

    /// Tracked segment names, including the identifying segment
    pub fn segments(&self) -> &[SegmentName] {
        &self.segments
    }

    pub fn resolver(&self) -> &CorrelationKeyResolver {
        &self.resolver
    }

    pub fn splitter(&self) -> &SegmentSplitter {
        &self.splitter
    }

    /// Builds a record from one transcript entry
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text holds no recognizable segment
    pub fn build(
        &self,
        side: RecordSide,
        line_number: usize,
        raw: &str,
    ) -> Result<Record, ParseError> {
        let repaired = self.repair(raw);
        let message = parse_message(&repaired)?;
        let segments = extract_segments(&message, &self.segments);
        let key = self.resolver.resolve(&segments);

        if key.is_none() {
            tracing::debug!(side = %side, line = line_number, "Record has no correlation key");
        }

        Ok(Record::new(side, line_number, raw, message, segments, key))
    }

    fn repair<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        if !self.resegment {
            return Cow::Borrowed(raw);
        }
        match EncodingCharacters::from_header(raw.trim_start()) {
            Some(encoding) if encoding.field != EncodingCharacters::default().field => {
                self.splitter.clone().with_encoding(&encoding).split(raw)
            }
            _ => self.splitter.split(raw),
        }
    }
}

/// `segments` without duplicates, plus the identifying segment the key is
/// read from
fn tracked(segments: Vec<SegmentName>, resolver: &CorrelationKeyResolver) -> Vec<SegmentName> {
    let mut unique: Vec<SegmentName> = Vec::with_capacity(segments.len() + 1);
    for name in segments
        .into_iter()
        .chain(std::iter::once(resolver.segment().clone()))
    {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}
