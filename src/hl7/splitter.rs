//! Segment re-segmentation for transcripts missing segment terminators
//!
//! Some producers emit segments back to back (`...|ADTPID|1||123`). The
//! splitter restores the terminators with a single left-to-right scan that
//! recognizes a configured set of segment-name anchors. It is lexical: an
//! anchor is a recognized name followed directly by the field separator at a
//! position that is not already the start of a segment. It never changes
//! segment or field content, only inserts terminators.
//!
//! The recognized names are independent of the segments a comparison looks
//! at: [`SegmentSplitter::standard`] knows the HL7 v2 segment table and
//! treats any `Z` name (`ZPD`, `Z01`) as a custom segment.
//!
//! Known limitation: a field whose value ends with a recognized name and is
//! followed by a field separator (`|DR OBX|`) is indistinguishable from a
//! missing terminator and is split.

use crate::domain::ids::SegmentName;
use crate::hl7::encoding::{is_segment_terminator, EncodingCharacters, SEGMENT_TERMINATOR};
use std::borrow::Cow;

/// Inserts missing segment terminators before recognized segment names
#[derive(Debug, Clone)]
pub struct SegmentSplitter {
    anchors: Vec<SegmentName>,
    custom_segments: bool,
    field_separator: char,
}

/// Segment names defined by the HL7 v2 standard (through v2.8)
pub const STANDARD_SEGMENTS: &[&str] = &[
    "ABS", "ACC", "ADD", "ADJ", "AFF", "AIG", "AIL", "AIP", "AIS", "AL1", "APR", "ARQ", "ARV",
    "AUT", "BHS", "BLC", "BLG", "BPO", "BPX", "BTS", "BTX", "BUI", "CDM", "CDO", "CER", "CM0",
    "CM1", "CM2", "CNS", "CON", "CSP", "CSR", "CSS", "CTD", "CTI", "DB1", "DG1", "DMI", "DON",
    "DRG", "DSC", "DSP", "ECD", "ECR", "EDU", "EQP", "EQU", "ERR", "EVN", "FAC", "FHS", "FT1",
    "FTS", "GOL", "GP1", "GP2", "GT1", "IAM", "IAR", "IIM", "ILT", "IN1", "IN2", "IN3", "INV",
    "IPC", "IPR", "ISD", "ITM", "IVC", "IVT", "LAN", "LCC", "LCH", "LDP", "LOC", "LRL", "MFA",
    "MFE", "MFI", "MRG", "MSA", "MSH", "NCK", "NDS", "NK1", "NPU", "NSC", "NST", "NTE", "OBR",
    "OBX", "ODS", "ODT", "OM1", "OM2", "OM3", "OM4", "OM5", "OM6", "OM7", "ORC", "ORG", "OVR",
    "PAC", "PCE", "PCR", "PD1", "PDA", "PDC", "PEO", "PES", "PID", "PKG", "PMT", "PR1", "PRA",
    "PRB", "PRC", "PRD", "PRT", "PSG", "PSH", "PTH", "PV1", "PV2", "PYE", "QAK", "QID", "QPD",
    "QRD", "QRF", "QRI", "RCP", "RDF", "RDT", "REL", "RF1", "RFI", "RGS", "RMI", "ROL", "RQ1",
    "RQD", "RXA", "RXC", "RXD", "RXE", "RXG", "RXO", "RXR", "RXV", "SAC", "SCD", "SCH", "SCP",
    "SDD", "SFT", "SGH", "SGT", "SHP", "SID", "SLT", "SPM", "STF", "STZ", "TCC", "TCD", "TQ1",
    "TQ2", "TXA", "UAC", "UB1", "UB2", "URD", "URS", "VAR", "VND",
];

impl SegmentSplitter {
    /// Creates a splitter recognizing exactly the given names, using the
    /// default field separator
    pub fn new(anchors: impl IntoIterator<Item = SegmentName>) -> Self {
        let mut splitter = Self {
            anchors: Vec::new(),
            custom_segments: false,
            field_separator: EncodingCharacters::default().field,
        };
        splitter.extend(anchors);
        splitter
    }

    /// Creates a splitter recognizing every standard HL7 v2 segment name and
    /// any `Z` custom segment
    pub fn standard() -> Self {
        let mut splitter = Self::new(
            STANDARD_SEGMENTS
                .iter()
                .map(|name| SegmentName::from_known(name)),
        );
        splitter.custom_segments = true;
        splitter
    }

    /// Also recognizes `names`
    pub fn with_anchors(mut self, names: impl IntoIterator<Item = SegmentName>) -> Self {
        self.extend(names);
        self
    }

    fn extend(&mut self, names: impl IntoIterator<Item = SegmentName>) {
        for name in names {
            if !self.anchors.contains(&name) {
                self.anchors.push(name);
            }
        }
    }

    /// Uses the field separator of the given encoding instead of the default
    pub fn with_encoding(mut self, encoding: &EncodingCharacters) -> Self {
        self.field_separator = encoding.field;
        self
    }

    pub fn anchors(&self) -> &[SegmentName] {
        &self.anchors
    }

    /// True when `Z` custom segment names are recognized generically
    pub fn recognizes_custom_segments(&self) -> bool {
        self.custom_segments
    }

    /// Returns `raw` with a terminator before every anchor that does not
    /// already start a segment. Borrows the input when nothing changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use hl7diff::domain::SegmentName;
    /// use hl7diff::hl7::SegmentSplitter;
    ///
    /// let splitter = SegmentSplitter::new(vec![
    ///     SegmentName::new("MSH").unwrap(),
    ///     SegmentName::new("PID").unwrap(),
    /// ]);
    /// assert_eq!(splitter.split("MSH|^~\\&|APPPID|1||123"), "MSH|^~\\&|APP\rPID|1||123");
    /// ```
    pub fn split<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        let mut out: Option<String> = None;
        let mut copied_until = 0;
        let mut at_segment_start = true;
        let mut pos = 0;

        while let Some(ch) = raw[pos..].chars().next() {
            if is_segment_terminator(ch) {
                at_segment_start = true;
                pos += ch.len_utf8();
                continue;
            }

            if !at_segment_start {
                if let Some(anchor_len) = self.anchor_at(&raw[pos..]) {
                    let buf = out.get_or_insert_with(|| String::with_capacity(raw.len() + 16));
                    buf.push_str(&raw[copied_until..pos]);
                    buf.push(SEGMENT_TERMINATOR);
                    copied_until = pos;
                    // the name itself is not rescanned
                    pos += anchor_len;
                    continue;
                }
            }

            at_segment_start = false;
            pos += ch.len_utf8();
        }

        match out {
            Some(mut buf) => {
                buf.push_str(&raw[copied_until..]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(raw),
        }
    }

    /// Byte length of the anchor (name plus separator) starting `rest`
    fn anchor_at(&self, rest: &str) -> Option<usize> {
        let name_len = self
            .anchors
            .iter()
            .find(|name| rest.starts_with(name.as_str()))
            .map(|name| name.as_str().len())
            .or_else(|| (self.custom_segments && is_custom_segment(rest)).then_some(3))?;

        rest[name_len..]
            .starts_with(self.field_separator)
            .then(|| name_len + self.field_separator.len_utf8())
    }
}

/// `Z` followed by two uppercase letters or digits
fn is_custom_segment(rest: &str) -> bool {
    match rest.as_bytes() {
        [b'Z', a, b, ..] => [a, b]
            .iter()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn splitter() -> SegmentSplitter {
        SegmentSplitter::new(
            ["MSH", "EVN", "PID", "NK1", "PV1", "OBX"]
                .iter()
                .map(|n| SegmentName::new(*n).unwrap()),
        )
    }

    #[test_case("MSH|^~\\&|APPPID|1||123", "MSH|^~\\&|APP\rPID|1||123" ; "single missing terminator")]
    #[test_case("MSH|^~\\&|APPEVN|A01PID|1NK1|1NK1|2", "MSH|^~\\&|APP\rEVN|A01\rPID|1\rNK1|1\rNK1|2" ; "several missing terminators")]
    #[test_case("MSH|^~\\&|A\rPID|1PV1|1", "MSH|^~\\&|A\rPID|1\rPV1|1" ; "mixed terminated and unterminated")]
    #[test_case("MSH|^~\\&|MRN^^^MRNPID|1", "MSH|^~\\&|MRN^^^MRN\rPID|1" ; "name glued to alphanumeric data")]
    #[test_case("MSH|^~\\&|A\nPID|1PV1|1", "MSH|^~\\&|A\nPID|1\rPV1|1" ; "newline counts as terminator")]
    fn test_split_inserts_terminators(input: &str, expected: &str) {
        assert_eq!(splitter().split(input), expected);
    }

    #[test_case("MSH|^~\\&|A\rPID|1||123\rPV1|1" ; "carriage returns")]
    #[test_case("MSH|^~\\&|A\r\nPID|1||123\r\nPV1|1" ; "crlf")]
    #[test_case("PID|1||123" ; "anchor at start of text")]
    #[test_case("" ; "empty")]
    fn test_split_is_noop_when_terminated(input: &str) {
        let result = splitter().split(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test_case("MSH|^~\\&|A\rNTE|1||Discussed with PID team" ; "name followed by space")]
    #[test_case("MSH|^~\\&|A\rNTE|1||see PID\\F\\3 for details" ; "name followed by escaped separator")]
    #[test_case("MSH|^~\\&|A\rNTE|1||code PID^OTHER" ; "name followed by component separator")]
    #[test_case("MSH|^~\\&|A\rNTE|1||rapid|x" ; "lower case name")]
    #[test_case("MSH|^~\\&|A\rNTE|1||PIDX|x" ; "name inside longer token")]
    fn test_split_ignores_names_in_free_text(input: &str) {
        assert_eq!(splitter().split(input), input);
    }

    #[test]
    fn test_split_known_false_positive_on_trailing_name() {
        // A field value ending in a recognized name is split; this is the
        // documented limitation of lexical re-segmentation.
        let input = "MSH|^~\\&|A\rNTE|1|DR OBX|next";
        assert_eq!(splitter().split(input), "MSH|^~\\&|A\rNTE|1|DR \rOBX|next");
    }

    #[test]
    fn test_split_is_idempotent() {
        let s = splitter();
        let once = s.split("MSH|^~\\&|APPPID|1||123PV1|1NK1|1").into_owned();
        assert_eq!(s.split(&once), once);
    }

    #[test]
    fn test_split_preserves_content() {
        let input = "MSH|^~\\&|APPPID|1||ÄÖÜ^Straße";
        let result = splitter().split(input);
        assert_eq!(result.replace('\r', ""), input);
    }

    #[test]
    fn test_split_unrecognized_names_untouched() {
        let input = "MSH|^~\\&|AZPD|1";
        assert_eq!(splitter().split(input), input);
    }

    #[test]
    fn test_split_with_custom_field_separator() {
        let enc = EncodingCharacters::from_header("MSH#^~\\&#A").unwrap();
        let s = splitter().with_encoding(&enc);
        assert_eq!(s.split("MSH#^~\\&#APID#1"), "MSH#^~\\&#A\rPID#1");
        assert_eq!(s.split("MSH#^~\\&#APID|1"), "MSH#^~\\&#APID|1");
    }

    #[test_case("MSH|^~\\&|APPEVN|A01PID|1||123PV1|1|I", "MSH|^~\\&|APP\rEVN|A01\rPID|1||123\rPV1|1|I" ; "common segments")]
    #[test_case("MSH|^~\\&|APID|1||123GT1|1ROL|1SPM|1", "MSH|^~\\&|A\rPID|1||123\rGT1|1\rROL|1\rSPM|1" ; "less common segments")]
    #[test_case("MSH|^~\\&|APID|1||123ZPD|1Z01|x", "MSH|^~\\&|A\rPID|1||123\rZPD|1\rZ01|x" ; "custom segments")]
    fn test_standard_splitter(input: &str, expected: &str) {
        assert_eq!(SegmentSplitter::standard().split(input), expected);
    }

    #[test]
    fn test_standard_splitter_ignores_non_segment_tokens() {
        let s = SegmentSplitter::standard();
        let input = "MSH|^~\\&|A\rPID|1||123||ZEBRA|Za1|x";
        assert_eq!(s.split(input), input);
        assert!(s.recognizes_custom_segments());
        assert!(!splitter().recognizes_custom_segments());
    }

    #[test]
    fn test_with_anchors_adds_site_specific_names() {
        let s = SegmentSplitter::new(vec![SegmentName::new("PID").unwrap()])
            .with_anchors(vec![SegmentName::new("XYZ").unwrap()]);
        assert_eq!(s.split("PID|1||123XYZ|1"), "PID|1||123\rXYZ|1");
    }

    #[test]
    fn test_duplicate_anchors_collapsed() {
        let pid = SegmentName::new("PID").unwrap();
        let s = SegmentSplitter::new(vec![pid.clone(), pid]);
        assert_eq!(s.anchors().len(), 1);
    }
}
