//! Integration tests for splitting, parsing and extraction
//!
//! Covers splitter idempotence, parser determinism, ordered grouping of
//! repeated segments and correlation key resolution.

use hl7diff::core::compare::RecordBuilder;
use hl7diff::core::correlation::{correlate, CorrelationKeyResolver};
use hl7diff::domain::{RecordSide, SegmentName};
use hl7diff::hl7::{extract_segments, parse_message, Field, SegmentSplitter};
use std::borrow::Cow;
use test_case::test_case;

fn names(list: &[&str]) -> Vec<SegmentName> {
    list.iter().map(|n| SegmentName::new(*n).unwrap()).collect()
}

fn splitter() -> SegmentSplitter {
    SegmentSplitter::new(names(&["MSH", "EVN", "PID", "NK1", "PV1", "OBR", "OBX"]))
}

#[test_case("MSH|^~\\&|A\rPID|1||123" ; "two segments")]
#[test_case("MSH|^~\\&|A\rEVN|A01\rPID|1||123\rNK1|1\rNK1|2\rPV1|1|I" ; "several segments")]
#[test_case("MSH|^~\\&|A\r\nPID|1||123\r\n" ; "crlf terminators")]
#[test_case("PID|1||123||NOTE ABOUT OBX RESULTS" ; "segment name inside free text")]
fn test_splitter_is_noop_on_terminated_text(raw: &str) {
    let split = splitter().split(raw);
    assert!(matches!(split, Cow::Borrowed(_)));
    assert_eq!(split, raw);
}

#[test]
fn test_splitter_output_is_a_fixed_point() {
    let s = splitter();
    let once = s.split("MSH|^~\\&|APPEVN|A01PID|1||123NK1|1NK1|2").into_owned();
    assert_eq!(once, "MSH|^~\\&|APP\rEVN|A01\rPID|1||123\rNK1|1\rNK1|2");
    assert_eq!(s.split(&once), once);
}

#[test]
fn test_parsing_is_deterministic() {
    let raw = "MSH|^~\\&|A|B\rPID|1||123^^^MRN~456^^^SSN||DOE^JOHN\rOBX|1|ST|X||a&b";
    let first = parse_message(raw).unwrap();
    let second = parse_message(raw).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parse_rejects_text_without_segments() {
    assert!(parse_message("").is_err());
    assert!(parse_message("this is not hl7").is_err());
}

#[test]
fn test_repeated_segments_keep_message_order() {
    let message =
        parse_message("MSH|^~\\&|A\rNK1|1|FIRST\rPID|1||123\rNK1|2|SECOND\rNK1|3|THIRD").unwrap();
    let wanted = names(&["NK1", "PID"]);
    let groups = extract_segments(&message, &wanted);

    let nk1: Vec<&str> = groups
        .get(&wanted[0])
        .iter()
        .map(|segment| segment.field(2).map(Field::first_value).unwrap_or_default())
        .collect();
    assert_eq!(nk1, vec!["FIRST", "SECOND", "THIRD"]);
    assert_eq!(groups.get(&wanted[1]).len(), 1);
}

#[test]
fn test_unrequested_segments_are_not_extracted() {
    let message = parse_message("MSH|^~\\&|A\rPID|1||123\rZZ1|custom").unwrap();
    let wanted = names(&["PID"]);
    let groups = extract_segments(&message, &wanted);

    assert_eq!(groups.segment_count(), 1);
    assert!(groups.get(&SegmentName::new("MSH").unwrap()).is_empty());
}

#[test_case("MSH|^~\\&|A\rPID|1||123", Some("123") ; "key present")]
#[test_case("MSH|^~\\&|A\rPID|1||123^^^MRN", Some("123") ; "key takes first component")]
#[test_case("MSH|^~\\&|A\rPID|1", None ; "short pid")]
#[test_case("MSH|^~\\&|A\rPID|1||", None ; "empty key")]
#[test_case("MSH|^~\\&|A\rEVN|A01", None ; "no pid")]
fn test_correlation_key(raw: &str, expected: Option<&str>) {
    let builder = RecordBuilder::new(names(&["MSH"]));
    let record = builder.build(RecordSide::Output, 1, raw).unwrap();
    assert_eq!(
        hl7diff::correlation_key(&record).map(|k| k.as_str()),
        expected
    );
}

#[test]
fn test_custom_key_location() {
    let builder = RecordBuilder::new(names(&["MSH"]))
        .with_resolver(CorrelationKeyResolver::new(SegmentName::new("PV1").unwrap(), 19));
    let record = builder
        .build(
            RecordSide::Output,
            1,
            "MSH|^~\\&|A\rPID|1||123\rPV1|1|I|||||||||||||||||VISIT-9",
        )
        .unwrap();
    assert_eq!(record.correlation_key().unwrap().as_str(), "VISIT-9");
}

#[test]
fn test_keyless_records_are_excluded_from_pairing() {
    let builder = RecordBuilder::new(names(&["MSH", "PID"]));
    let outputs = vec![
        builder.build(RecordSide::Output, 1, "MSH|^~\\&|A\rPID|1||123").unwrap(),
        builder.build(RecordSide::Output, 2, "MSH|^~\\&|A\rEVN|A01").unwrap(),
    ];
    let examples = vec![
        builder.build(RecordSide::Example, 1, "MSH|^~\\&|A\rEVN|A01").unwrap(),
        builder.build(RecordSide::Example, 2, "MSH|^~\\&|A\rPID|1||123").unwrap(),
    ];

    let correlation = correlate(&outputs, &examples);
    assert_eq!(correlation.pairs.len(), 1);
    assert_eq!(correlation.pairs[0].output_index, 0);
    assert_eq!(correlation.pairs[0].example_index, 1);
    assert_eq!(correlation.keyless_output, vec![2]);
    assert_eq!(correlation.keyless_example, vec![1]);
}

#[test]
fn test_flattened_record_is_resegmented_before_parsing() {
    let builder = RecordBuilder::new(names(&["MSH", "EVN", "PID"]));
    let record = builder
        .build(RecordSide::Output, 1, "MSH|^~\\&|APPEVN|A01PID|1||123")
        .unwrap();

    assert_eq!(record.message().len(), 3);
    assert_eq!(record.correlation_key().unwrap().as_str(), "123");
}
