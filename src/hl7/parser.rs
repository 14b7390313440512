//! HL7 v2 message parser
//!
//! Parses terminator-delimited text into [`Message`] -> [`Segment`] ->
//! [`Field`]. Segments end at `\r`, `\n` or `\r\n`. Encoding characters are
//! taken from the first header segment when present, otherwise the HL7
//! defaults apply. Lines that do not start with a segment name are skipped;
//! the message fails only when no line is recognizable.

use crate::domain::errors::ParseError;
use crate::domain::ids::SegmentName;
use crate::hl7::encoding::{is_segment_terminator, EncodingCharacters};
use crate::hl7::message::{Field, Message, Segment};

/// Parses one message
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for blank input and
/// [`ParseError::NoSegments`] when no line starts with a segment name.
///
/// # Examples
///
/// ```
/// use hl7diff::hl7::parse_message;
///
/// let message = parse_message("MSH|^~\\&|A\rPID|1||123").unwrap();
/// assert_eq!(message.len(), 2);
/// assert_eq!(message.segments()[1].field(3).unwrap().first_value(), "123");
/// ```
pub fn parse_message(text: &str) -> Result<Message, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let lines: Vec<&str> = text
        .split(is_segment_terminator)
        .filter(|line| !line.trim().is_empty())
        .collect();

    let encoding = lines
        .iter()
        .find_map(|line| EncodingCharacters::from_header(line))
        .unwrap_or_default();

    let mut segments = Vec::with_capacity(lines.len());
    for line in lines {
        match parse_segment(line, &encoding) {
            Some(segment) => segments.push(segment),
            None => {
                tracing::debug!(line = %line, "Skipping unrecognized segment line");
            }
        }
    }

    if segments.is_empty() {
        return Err(ParseError::no_segments(text));
    }

    Ok(Message::new(segments, encoding))
}

/// Parses a single segment line, or `None` if it does not start with a
/// segment name followed by the field separator (or end of line)
pub fn parse_segment(line: &str, encoding: &EncodingCharacters) -> Option<Segment> {
    let name = SegmentName::new(line.get(..3)?).ok()?;
    let rest = &line[3..];

    if rest.is_empty() {
        return Some(Segment::new(name, Vec::new()));
    }

    let body = rest.strip_prefix(encoding.field)?;
    let mut fields = Vec::new();

    if name.is_header() {
        // MSH.1 is the separator and MSH.2 the encoding characters; neither
        // is split into components
        fields.push(Field::value(encoding.field.to_string()));
        let mut parts = body.split(encoding.field);
        fields.push(Field::value(parts.next().unwrap_or_default()));
        fields.extend(parts.map(|raw| Field::parse(raw, encoding)));
    } else {
        fields.extend(body.split(encoding.field).map(|raw| Field::parse(raw, encoding)));
    }

    Some(Segment::new(name, fields))
}
