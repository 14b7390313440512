//! Segment extraction by name
//!
//! Groups the segments of a message under a configured, ordered list of
//! segment names. Every configured name gets an entry, possibly empty;
//! segments whose names are not configured are dropped.

use crate::domain::ids::SegmentName;
use crate::hl7::message::{Message, Segment};
use serde::{Deserialize, Serialize};

/// Segments of one message grouped by name, in configured name order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentGroups {
    groups: Vec<(SegmentName, Vec<Segment>)>,
}

impl SegmentGroups {
    /// Occurrences of `name` in message order; empty when the name is not
    /// tracked or absent from the message
    pub fn get(&self, name: &SegmentName) -> &[Segment] {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, segments)| segments.as_slice())
            .unwrap_or(&[])
    }

    /// First occurrence of `name`
    pub fn first(&self, name: &SegmentName) -> Option<&Segment> {
        self.get(name).first()
    }

    /// Tracked names in configured order
    pub fn names(&self) -> impl Iterator<Item = &SegmentName> {
        self.groups.iter().map(|(name, _)| name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SegmentName, &[Segment])> {
        self.groups
            .iter()
            .map(|(name, segments)| (name, segments.as_slice()))
    }

    /// Number of tracked names
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of segments across all tracked names
    pub fn segment_count(&self) -> usize {
        self.groups.iter().map(|(_, segments)| segments.len()).sum()
    }
}

/// Groups the segments of `message` under each of `names`
///
/// # Examples
///
/// ```
/// use hl7diff::domain::SegmentName;
/// use hl7diff::hl7::{extract_segments, parse_message};
///
/// let message = parse_message("MSH|^~\\&|A\rNK1|1\rNK1|2\rZZZ|x").unwrap();
/// let nk1 = SegmentName::new("NK1").unwrap();
/// let groups = extract_segments(&message, &[nk1.clone()]);
/// assert_eq!(groups.get(&nk1).len(), 2);
/// ```
pub fn extract_segments(message: &Message, names: &[SegmentName]) -> SegmentGroups {
    let mut groups: Vec<(SegmentName, Vec<Segment>)> = Vec::with_capacity(names.len());

    for name in names {
        if groups.iter().any(|(n, _)| n == name) {
            continue;
        }
        let matching = message.segments_named(name).cloned().collect();
        groups.push((name.clone(), matching));
    }

    SegmentGroups { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hl7::parser::parse_message;

    fn names(list: &[&str]) -> Vec<SegmentName> {
        list.iter().map(|n| SegmentName::new(*n).unwrap()).collect()
    }

    #[test]
    fn test_repeated_segments_keep_order() {
        let message =
            parse_message("MSH|^~\\&|A\rNK1|1|FIRST\rPID|1\rNK1|2|SECOND\rNK1|3|THIRD").unwrap();
        let tracked = names(&["PID", "NK1"]);
        let groups = extract_segments(&message, &tracked);

        let nk1 = groups.get(&tracked[1]);
        assert_eq!(nk1.len(), 3);
        let order: Vec<&str> = nk1
            .iter()
            .map(|s| s.field(2).unwrap().first_value())
            .collect();
        assert_eq!(order, vec!["FIRST", "SECOND", "THIRD"]);
    }

    #[test]
    fn test_configured_names_present_even_when_absent() {
        let message = parse_message("MSH|^~\\&|A\rPID|1").unwrap();
        let tracked = names(&["PID", "PV1"]);
        let groups = extract_segments(&message, &tracked);

        assert_eq!(groups.len(), 2);
        assert!(groups.get(&tracked[1]).is_empty());
        let listed: Vec<&str> = groups.names().map(|n| n.as_str()).collect();
        assert_eq!(listed, vec!["PID", "PV1"]);
    }

    #[test]
    fn test_unconfigured_names_dropped() {
        let message = parse_message("MSH|^~\\&|A\rPID|1\rZPD|custom").unwrap();
        let groups = extract_segments(&message, &names(&["PID"]));

        assert_eq!(groups.segment_count(), 1);
        assert!(groups.get(&SegmentName::new("ZPD").unwrap()).is_empty());
        assert!(groups.get(&SegmentName::new("MSH").unwrap()).is_empty());
    }

    #[test]
    fn test_duplicate_names_collapsed() {
        let message = parse_message("PID|1").unwrap();
        let groups = extract_segments(&message, &names(&["PID", "PID"]));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups.segment_count(), 1);
    }

    #[test]
    fn test_first() {
        let message = parse_message("PID|1\rPID|2").unwrap();
        let tracked = names(&["PID"]);
        let groups = extract_segments(&message, &tracked);
        assert_eq!(
            groups.first(&tracked[0]).unwrap().field(1).unwrap().first_value(),
            "1"
        );
    }
}
