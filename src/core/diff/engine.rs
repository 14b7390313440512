//! Structured field diff between correlated records
//!
//! Segments are paired by name and ordinal position, then compared field by
//! field with recursive structural equality. The engine never fails: missing
//! or short data only means there is less to compare.

use crate::core::diff::report::{MismatchEntry, MismatchKind};
use crate::core::diff::rules::{DiffOptions, ExtraSegmentPolicy, IgnoreRules, MissingFieldPolicy};
use crate::domain::ids::{PatientId, SegmentName};
use crate::domain::record::Record;
use crate::hl7::{EncodingCharacters, Segment};

/// Compares output records against example records
#[derive(Debug, Clone)]
pub struct DiffEngine {
    segments: Vec<SegmentName>,
    rules: IgnoreRules,
    options: DiffOptions,
}

/// One side of a comparison: its segments for the current name and the
/// encoding used to render values
struct Side<'a> {
    record: &'a Record,
    encoding: &'a EncodingCharacters,
}

impl<'a> Side<'a> {
    fn new(record: &'a Record) -> Self {
        Self {
            record,
            encoding: record.message().encoding(),
        }
    }

    fn occurrences(&self, name: &SegmentName) -> &'a [Segment] {
        self.record.segments().get(name)
    }
}

impl DiffEngine {
    /// Creates an engine for the ordered segment names. Duplicate names are
    /// compared once.
    pub fn new(segments: Vec<SegmentName>, rules: IgnoreRules, options: DiffOptions) -> Self {
        let mut unique: Vec<SegmentName> = Vec::with_capacity(segments.len());
        for name in segments {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self {
            segments: unique,
            rules,
            options,
        }
    }

    pub fn segments(&self) -> &[SegmentName] {
        &self.segments
    }

    pub fn rules(&self) -> &IgnoreRules {
        &self.rules
    }

    pub fn options(&self) -> DiffOptions {
        self.options
    }

    /// Compares two records sharing a correlation key
    ///
    /// Entries come out in configured segment order, then occurrence, then
    /// field index.
    pub fn diff(&self, output: &Record, example: &Record) -> Vec<MismatchEntry> {
        diff_records(&self.segments, &self.rules, self.options, output, example)
    }
}

/// Compares two records over the segment names tracked by the output record,
/// with default policies
///
/// # Examples
///
/// ```
/// use hl7diff::core::compare::RecordBuilder;
/// use hl7diff::core::diff::{diff, IgnoreRules};
/// use hl7diff::domain::{RecordSide, SegmentName};
///
/// let builder = RecordBuilder::new(vec![SegmentName::new("PID").unwrap()]);
/// let output = builder.build(RecordSide::Output, 1, "PID|1||123||SMITH").unwrap();
/// let example = builder.build(RecordSide::Example, 1, "PID|1||123||SMYTH").unwrap();
///
/// let entries = diff(&output, &example, &IgnoreRules::new());
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].field_index, 5);
/// ```
pub fn diff(output: &Record, example: &Record, rules: &IgnoreRules) -> Vec<MismatchEntry> {
    let names: Vec<SegmentName> = output.segments().names().cloned().collect();
    diff_records(&names, rules, DiffOptions::default(), output, example)
}

fn diff_records(
    names: &[SegmentName],
    rules: &IgnoreRules,
    options: DiffOptions,
    output: &Record,
    example: &Record,
) -> Vec<MismatchEntry> {
    let key = output
        .correlation_key()
        .or_else(|| example.correlation_key());
    let output = Side::new(output);
    let example = Side::new(example);
    let mut entries = Vec::new();

    for name in names {
        let output_segments = output.occurrences(name);
        let example_segments = example.occurrences(name);

        for (index, (out_segment, ex_segment)) in
            output_segments.iter().zip(example_segments).enumerate()
        {
            if out_segment.is_empty() || ex_segment.is_empty() {
                continue;
            }
            let mut pair = SegmentPair {
                key,
                name,
                occurrence: index + 1,
                rules,
                output: (out_segment, output.encoding),
                example: (ex_segment, example.encoding),
                entries: &mut entries,
            };
            pair.compare_fields();
            if options.missing_fields == MissingFieldPolicy::Report {
                pair.report_missing_fields();
            }
        }

        if options.extra_segments == ExtraSegmentPolicy::Report {
            report_unpaired(key, name, &output, &example, &mut entries);
        }
    }

    entries
}

struct SegmentPair<'a, 'e> {
    key: Option<&'a PatientId>,
    name: &'a SegmentName,
    occurrence: usize,
    rules: &'a IgnoreRules,
    output: (&'a Segment, &'a EncodingCharacters),
    example: (&'a Segment, &'a EncodingCharacters),
    entries: &'e mut Vec<MismatchEntry>,
}

impl SegmentPair<'_, '_> {
    fn entry(
        &self,
        field_index: usize,
        kind: MismatchKind,
        output_value: Option<String>,
        example_value: Option<String>,
    ) -> MismatchEntry {
        MismatchEntry {
            correlation_key: self.key.cloned(),
            segment: self.name.clone(),
            occurrence: self.occurrence,
            field_index,
            kind,
            output_value,
            example_value,
        }
    }

    fn compare_fields(&mut self) {
        let (out_segment, out_encoding) = self.output;
        let (ex_segment, ex_encoding) = self.example;

        let compared = out_segment.fields().iter().zip(ex_segment.fields());
        for (field_index, (out_field, ex_field)) in compared.enumerate() {
            if self.rules.is_ignored(self.name, field_index) || out_field == ex_field {
                continue;
            }
            let entry = self.entry(
                field_index,
                MismatchKind::Value,
                Some(out_field.encode(out_encoding)),
                Some(ex_field.encode(ex_encoding)),
            );
            self.entries.push(entry);
        }
    }

    fn report_missing_fields(&mut self) {
        let (out_segment, out_encoding) = self.output;
        let (ex_segment, ex_encoding) = self.example;
        let shared = out_segment.len().min(ex_segment.len());

        for field_index in shared..out_segment.len().max(ex_segment.len()) {
            if self.rules.is_ignored(self.name, field_index) {
                continue;
            }
            let output_value = out_segment
                .field(field_index)
                .filter(|field| !field.is_empty())
                .map(|field| field.encode(out_encoding));
            let example_value = ex_segment
                .field(field_index)
                .filter(|field| !field.is_empty())
                .map(|field| field.encode(ex_encoding));
            if output_value.is_none() && example_value.is_none() {
                continue;
            }
            let entry = self.entry(
                field_index,
                MismatchKind::MissingField,
                output_value,
                example_value,
            );
            self.entries.push(entry);
        }
    }
}

fn report_unpaired(
    key: Option<&PatientId>,
    name: &SegmentName,
    output: &Side<'_>,
    example: &Side<'_>,
    entries: &mut Vec<MismatchEntry>,
) {
    let output_segments = output.occurrences(name);
    let example_segments = example.occurrences(name);
    let shared = output_segments.len().min(example_segments.len());

    let extras = output_segments
        .iter()
        .skip(shared)
        .map(|segment| (Some(segment.encode(output.encoding)), None))
        .chain(
            example_segments
                .iter()
                .skip(shared)
                .map(|segment| (None, Some(segment.encode(example.encoding)))),
        );

    for (offset, (output_value, example_value)) in extras.enumerate() {
        entries.push(MismatchEntry {
            correlation_key: key.cloned(),
            segment: name.clone(),
            occurrence: shared + offset + 1,
            field_index: 0,
            kind: MismatchKind::UnpairedSegment,
            output_value,
            example_value,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::correlation::CorrelationKeyResolver;
    use crate::domain::record::RecordSide;
    use crate::hl7::{extract_segments, parse_message};

    fn names(list: &[&str]) -> Vec<SegmentName> {
        list.iter().map(|n| SegmentName::new(*n).unwrap()).collect()
    }

    fn record(side: RecordSide, text: &str, tracked: &[SegmentName]) -> Record {
        let message = parse_message(text).unwrap();
        let groups = extract_segments(&message, tracked);
        let key = CorrelationKeyResolver::default().resolve(&groups);
        Record::new(side, 1, text, message, groups, key)
    }

    fn pair(output: &str, example: &str, tracked: &[SegmentName]) -> (Record, Record) {
        (
            record(RecordSide::Output, output, tracked),
            record(RecordSide::Example, example, tracked),
        )
    }

    fn engine(tracked: &[&str], rules: IgnoreRules, options: DiffOptions) -> DiffEngine {
        DiffEngine::new(names(tracked), rules, options)
    }

    #[test]
    fn test_identical_records_no_mismatch() {
        let tracked = names(&["MSH", "PID"]);
        let text = "MSH|^~\\&|A\rPID|1||123";
        let (output, example) = pair(text, text, &tracked);
        assert!(diff(&output, &example, &IgnoreRules::new()).is_empty());
    }

    #[test]
    fn test_identical_records_no_mismatch_with_rules() {
        let tracked = names(&["MSH", "PID"]);
        let text = "MSH|^~\\&|A|B|C|D|20240101||ADT^A01|MSG1|P|2.5\rPID|1||123||SMITH^JOHN";
        let (output, example) = pair(text, text, &tracked);
        let rules = IgnoreRules::new().with_rule(tracked[0].clone(), [7, 10]);
        assert!(diff(&output, &example, &rules).is_empty());
    }

    #[test]
    fn test_single_field_mismatch() {
        let tracked = names(&["MSH", "PID"]);
        let (output, example) = pair(
            "MSH|^~\\&|A\rPID|1||123||SMITH",
            "MSH|^~\\&|A\rPID|1||123||SMYTH",
            &tracked,
        );

        let entries = diff(&output, &example, &IgnoreRules::new());
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.correlation_key.as_ref().unwrap().as_str(), "123");
        assert_eq!(entry.segment.as_str(), "PID");
        assert_eq!(entry.occurrence, 1);
        assert_eq!(entry.field_index, 5);
        assert_eq!(entry.kind, MismatchKind::Value);
        assert_eq!(entry.output_value.as_deref(), Some("SMITH"));
        assert_eq!(entry.example_value.as_deref(), Some("SMYTH"));
    }

    #[test]
    fn test_ignored_field_suppressed() {
        let tracked = names(&["MSH"]);
        let (output, example) = pair(
            "MSH|^~\\&|A|B|C|D|20240101120000||ADT^A01|MSG001",
            "MSH|^~\\&|A|B|C|D|20231231080000||ADT^A01|MSG999",
            &tracked,
        );
        let rules = IgnoreRules::new().with_rule(tracked[0].clone(), [7, 10]);
        assert!(diff(&output, &example, &rules).is_empty());

        let partial = IgnoreRules::new().with_rule(tracked[0].clone(), [7]);
        let entries = diff(&output, &example, &partial);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field_index, 10);
    }

    #[test]
    fn test_rules_for_other_segment_do_not_apply() {
        let tracked = names(&["PID"]);
        let (output, example) = pair("PID|1||123||SMITH", "PID|1||123||SMYTH", &tracked);
        let rules = IgnoreRules::new().with_rule(SegmentName::new("NK1").unwrap(), [5]);
        assert_eq!(diff(&output, &example, &rules).len(), 1);
    }

    #[test]
    fn test_component_difference_is_mismatch() {
        let tracked = names(&["PID"]);
        let (output, example) = pair(
            "PID|1||123||SMITH^JOHN",
            "PID|1||123||SMITH^JANE",
            &tracked,
        );
        let entries = diff(&output, &example, &IgnoreRules::new());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].output_value.as_deref(), Some("SMITH^JOHN"));
    }

    #[test]
    fn test_repetition_and_component_not_equal() {
        let tracked = names(&["PID"]);
        let (output, example) = pair("PID|1||123||A~B", "PID|1||123||A^B", &tracked);
        assert_eq!(diff(&output, &example, &IgnoreRules::new()).len(), 1);
    }

    #[test]
    fn test_ordering_by_config_then_occurrence_then_field() {
        let tracked = names(&["PID", "NK1"]);
        let (output, example) = pair(
            "NK1|1|X|Y\rNK1|2|X|Y\rPID|1||123|A",
            "NK1|1|X|Z\rNK1|2|W|Y\rPID|1||123|B",
            &tracked,
        );
        let entries = diff(&output, &example, &IgnoreRules::new());
        let order: Vec<(&str, usize, usize)> = entries
            .iter()
            .map(|e| (e.segment.as_str(), e.occurrence, e.field_index))
            .collect();
        assert_eq!(order, vec![("PID", 1, 4), ("NK1", 1, 3), ("NK1", 2, 2)]);
    }

    #[test]
    fn test_shorter_segment_limits_comparison() {
        let tracked = names(&["PID"]);
        let (output, example) = pair("PID|1||123||SMITH|EXTRA", "PID|1||123", &tracked);
        assert!(diff(&output, &example, &IgnoreRules::new()).is_empty());
    }

    #[test]
    fn test_missing_segment_is_not_an_error() {
        let tracked = names(&["PID", "PV1"]);
        let (output, example) = pair("PID|1||123\rPV1|1|I", "PID|1||123", &tracked);
        assert!(diff(&output, &example, &IgnoreRules::new()).is_empty());
    }

    #[test]
    fn test_empty_segment_pair_skipped() {
        let tracked = names(&["PID", "PV1"]);
        let (output, example) = pair("PID|1||123\rPV1", "PID|1||123\rPV1|1|I", &tracked);
        assert!(diff(&output, &example, &IgnoreRules::new()).is_empty());
    }

    #[test]
    fn test_extra_occurrences_ignored_by_default() {
        let tracked = names(&["NK1"]);
        let (output, example) = pair("NK1|1|A\rNK1|2|B\rNK1|3|C", "NK1|1|A\rNK1|2|B", &tracked);
        let engine = engine(&["NK1"], IgnoreRules::new(), DiffOptions::default());
        assert!(engine.diff(&output, &example).is_empty());
    }

    #[test]
    fn test_extra_occurrences_reported() {
        let tracked = names(&["NK1"]);
        let (output, example) = pair("NK1|1|A", "NK1|1|A\rNK1|2|B\rNK1|3|C", &tracked);
        let options = DiffOptions {
            extra_segments: ExtraSegmentPolicy::Report,
            ..DiffOptions::default()
        };
        let entries = engine(&["NK1"], IgnoreRules::new(), options).diff(&output, &example);

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.kind == MismatchKind::UnpairedSegment));
        assert_eq!(entries[0].occurrence, 2);
        assert_eq!(entries[1].occurrence, 3);
        assert!(entries[0].output_value.is_none());
        assert_eq!(entries[1].example_value.as_deref(), Some("NK1|3|C"));
    }

    #[test]
    fn test_missing_fields_reported() {
        let tracked = names(&["PID"]);
        let (output, example) = pair("PID|1||123||SMITH||F", "PID|1||123", &tracked);
        let options = DiffOptions {
            missing_fields: MissingFieldPolicy::Report,
            ..DiffOptions::default()
        };
        let entries = engine(&["PID"], IgnoreRules::new(), options).diff(&output, &example);

        let indices: Vec<usize> = entries.iter().map(|e| e.field_index).collect();
        assert_eq!(indices, vec![5, 7]);
        assert!(entries.iter().all(|e| e.kind == MismatchKind::MissingField));
        assert_eq!(entries[0].output_value.as_deref(), Some("SMITH"));
        assert!(entries[0].example_value.is_none());
    }

    #[test]
    fn test_missing_fields_respect_ignore_rules() {
        let tracked = names(&["PID"]);
        let (output, example) = pair("PID|1||123||SMITH", "PID|1||123", &tracked);
        let options = DiffOptions {
            missing_fields: MissingFieldPolicy::Report,
            ..DiffOptions::default()
        };
        let rules = IgnoreRules::new().with_rule(tracked[0].clone(), [5]);
        assert!(engine(&["PID"], rules, options).diff(&output, &example).is_empty());
    }

    #[test]
    fn test_engine_names_dedup() {
        let engine = engine(&["PID", "PID", "NK1"], IgnoreRules::new(), DiffOptions::default());
        assert_eq!(engine.segments().len(), 2);
    }

    #[test]
    fn test_values_rendered_with_record_encoding() {
        let tracked = names(&["PID"]);
        let (output, example) = pair(
            "MSH#*~\\&#A\rPID#1##123##SMITH*JOHN",
            "MSH|^~\\&|A\rPID|1||123||SMITH^JANE",
            &tracked,
        );
        let entries = diff(&output, &example, &IgnoreRules::new());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].output_value.as_deref(), Some("SMITH*JOHN"));
        assert_eq!(entries[0].example_value.as_deref(), Some("SMITH^JANE"));
    }
}
