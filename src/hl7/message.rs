//! Structured HL7 message model
//!
//! Messages are immutable once parsed. Field index 0 of every segment holds
//! the segment name, so index `n` is HL7 field `n` (`PID.3` is index 3). For
//! header segments index 1 is the field separator and index 2 the raw
//! encoding characters, matching HL7 numbering (`MSH.7` is index 7).

use crate::domain::ids::SegmentName;
use crate::hl7::encoding::{Delimiter, EncodingCharacters};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A field value, nested by repetition, component and subcomponent.
///
/// A nesting level is only materialized when its delimiter occurs in the
/// text, so `SMITH` is a plain value while `SMITH^JOHN` is a component list.
/// The delimiter tag keeps `A~B` and `A^B` structurally distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Value(String),
    Repeated(Delimiter, Vec<Field>),
}

impl Field {
    /// Parses raw field text using the message's encoding characters
    ///
    /// # Examples
    ///
    /// ```
    /// use hl7diff::hl7::{Delimiter, EncodingCharacters, Field};
    ///
    /// let field = Field::parse("SMITH^JOHN", &EncodingCharacters::default());
    /// assert_eq!(
    ///     field,
    ///     Field::Repeated(
    ///         Delimiter::Component,
    ///         vec![Field::value("SMITH"), Field::value("JOHN")],
    ///     )
    /// );
    /// ```
    pub fn parse(raw: &str, encoding: &EncodingCharacters) -> Self {
        Self::parse_levels(raw, encoding, &Delimiter::NESTING)
    }

    fn parse_levels(raw: &str, encoding: &EncodingCharacters, levels: &[Delimiter]) -> Self {
        match levels.split_first() {
            None => Field::Value(raw.to_string()),
            Some((&level, inner)) => {
                let separator = encoding.delimiter(level);
                if raw.contains(separator) {
                    Field::Repeated(
                        level,
                        raw.split(separator)
                            .map(|part| Self::parse_levels(part, encoding, inner))
                            .collect(),
                    )
                } else {
                    Self::parse_levels(raw, encoding, inner)
                }
            }
        }
    }

    /// Creates a leaf value
    pub fn value(text: impl Into<String>) -> Self {
        Field::Value(text.into())
    }

    /// First leaf of the field: first repetition, first component, first
    /// subcomponent. Empty string when the field is empty.
    pub fn first_value(&self) -> &str {
        match self {
            Field::Value(text) => text,
            Field::Repeated(_, items) => items.first().map(Field::first_value).unwrap_or(""),
        }
    }

    /// True when every leaf of the field is empty
    pub fn is_empty(&self) -> bool {
        match self {
            Field::Value(text) => text.is_empty(),
            Field::Repeated(_, items) => items.iter().all(Field::is_empty),
        }
    }

    /// Re-encodes the field with the given encoding characters
    pub fn encode(&self, encoding: &EncodingCharacters) -> String {
        match self {
            Field::Value(text) => text.clone(),
            Field::Repeated(level, items) => {
                let separator = encoding.delimiter(*level).to_string();
                items
                    .iter()
                    .map(|item| item.encode(encoding))
                    .collect::<Vec<_>>()
                    .join(&separator)
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(&EncodingCharacters::default()))
    }
}

/// A named segment and its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    name: SegmentName,
    fields: Vec<Field>,
}

impl Segment {
    /// Creates a segment from its name and data fields (HL7 field 1 onwards)
    pub fn new(name: SegmentName, data_fields: Vec<Field>) -> Self {
        let mut fields = Vec::with_capacity(data_fields.len() + 1);
        fields.push(Field::value(name.as_str()));
        fields.extend(data_fields);
        Self { name, fields }
    }

    pub fn name(&self) -> &SegmentName {
        &self.name
    }

    /// Number of fields, counting the name at index 0
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the segment carries no fields beyond its name
    pub fn is_empty(&self) -> bool {
        self.fields.len() <= 1
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Re-encodes the segment as wire text, without a terminator
    pub fn encode(&self, encoding: &EncodingCharacters) -> String {
        let separator = encoding.field.to_string();
        let encoded: Vec<String> = self.fields.iter().map(|f| f.encode(encoding)).collect();

        if self.name.is_header() && encoded.len() > 1 {
            // MSH.1 is the separator itself and is not delimited on the wire
            let mut text = encoded[0].clone();
            text.push(encoding.field);
            text.push_str(&encoded[2..].join(&separator));
            text
        } else {
            encoded.join(&separator)
        }
    }
}

/// A parsed message: ordered segments plus the encoding in effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    segments: Vec<Segment>,
    encoding: EncodingCharacters,
}

impl Message {
    pub fn new(segments: Vec<Segment>, encoding: EncodingCharacters) -> Self {
        Self { segments, encoding }
    }

    /// Segments in input order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn encoding(&self) -> &EncodingCharacters {
        &self.encoding
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments with the given name, in input order
    pub fn segments_named<'a>(
        &'a self,
        name: &'a SegmentName,
    ) -> impl Iterator<Item = &'a Segment> + 'a {
        self.segments.iter().filter(move |s| s.name() == name)
    }

    /// First segment with the given name
    pub fn first(&self, name: &SegmentName) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name() == name)
    }
}
