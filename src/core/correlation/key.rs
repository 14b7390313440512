//! Correlation key resolution
//!
//! Derives the patient identifier that pairs an output record with its
//! example record. Resolution is permissive: a missing or short identifying
//! segment yields no key, which excludes the record from correlation rather
//! than failing it.

use crate::domain::ids::{PatientId, SegmentName};
use crate::hl7::SegmentGroups;

/// Default identifying segment
pub const DEFAULT_KEY_SEGMENT: &str = "PID";

/// Default identifying field (PID.3, patient identifier list)
pub const DEFAULT_KEY_FIELD: usize = 3;

/// Resolves the correlation key of a record from its grouped segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationKeyResolver {
    segment: SegmentName,
    field_index: usize,
}

impl CorrelationKeyResolver {
    pub fn new(segment: SegmentName, field_index: usize) -> Self {
        Self {
            segment,
            field_index,
        }
    }

    /// Segment the key is read from
    pub fn segment(&self) -> &SegmentName {
        &self.segment
    }

    pub fn field_index(&self) -> usize {
        self.field_index
    }

    /// Reads the key from the first occurrence of the identifying segment.
    ///
    /// Returns `None` when the segment is absent, has no field at the
    /// configured index, or the first repetition/component of that field is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use hl7diff::core::correlation::CorrelationKeyResolver;
    /// use hl7diff::domain::SegmentName;
    /// use hl7diff::hl7::{extract_segments, parse_message};
    ///
    /// let resolver = CorrelationKeyResolver::default();
    /// let message = parse_message("PID|1||123^^^MRN~456^^^SSN").unwrap();
    /// let groups = extract_segments(&message, &[SegmentName::new("PID").unwrap()]);
    /// assert_eq!(resolver.resolve(&groups).unwrap().as_str(), "123");
    /// ```
    pub fn resolve(&self, groups: &SegmentGroups) -> Option<PatientId> {
        let segment = groups.first(&self.segment)?;
        if segment.len() <= self.field_index {
            return None;
        }
        let value = segment.field(self.field_index)?.first_value();
        PatientId::new(value).ok()
    }
}

impl Default for CorrelationKeyResolver {
    fn default() -> Self {
        Self {
            segment: SegmentName::from_known(DEFAULT_KEY_SEGMENT),
            field_index: DEFAULT_KEY_FIELD,
        }
    }
}
