//! HL7 encoding characters
//!
//! HL7 v2 nests values four levels deep: segments hold fields, fields hold
//! repetitions, repetitions hold components and components hold
//! subcomponents. Each level has its own delimiter, declared by the header
//! segment (`MSH|^~\&`).

use serde::{Deserialize, Serialize};

/// Segment terminator written by the splitter
pub const SEGMENT_TERMINATOR: char = '\r';

/// Returns true for characters that end a segment in a transcript
pub fn is_segment_terminator(ch: char) -> bool {
    ch == '\r' || ch == '\n'
}

/// Delimiters that split a field into nested values, outermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Repetition,
    Component,
    Subcomponent,
}

impl Delimiter {
    /// Nesting order used when parsing a field
    pub const NESTING: [Delimiter; 3] = [
        Delimiter::Repetition,
        Delimiter::Component,
        Delimiter::Subcomponent,
    ];
}

/// The five encoding characters of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingCharacters {
    pub field: char,
    pub component: char,
    pub repetition: char,
    pub escape: char,
    pub subcomponent: char,
}

impl Default for EncodingCharacters {
    fn default() -> Self {
        Self {
            field: '|',
            component: '^',
            repetition: '~',
            escape: '\\',
            subcomponent: '&',
        }
    }
}

impl EncodingCharacters {
    /// Reads the encoding characters declared by a header segment line.
    ///
    /// Returns `None` unless the line starts with `MSH`, `BHS` or `FHS`
    /// followed by a field separator. Encoding characters missing from a
    /// truncated header fall back to the HL7 defaults.
    pub fn from_header(line: &str) -> Option<Self> {
        let name = line.get(..3)?;
        if !matches!(name, "MSH" | "BHS" | "FHS") {
            return None;
        }

        let mut chars = line[3..].chars();
        let field = chars.next()?;
        let defaults = Self::default();
        let declared: Vec<char> = chars.take_while(|&c| c != field).take(4).collect();

        Some(Self {
            field,
            component: declared.first().copied().unwrap_or(defaults.component),
            repetition: declared.get(1).copied().unwrap_or(defaults.repetition),
            escape: declared.get(2).copied().unwrap_or(defaults.escape),
            subcomponent: declared.get(3).copied().unwrap_or(defaults.subcomponent),
        })
    }

    /// Returns the character used for a nesting delimiter
    pub fn delimiter(&self, delimiter: Delimiter) -> char {
        match delimiter {
            Delimiter::Repetition => self.repetition,
            Delimiter::Component => self.component,
            Delimiter::Subcomponent => self.subcomponent,
        }
    }

    /// The MSH-2 representation of these characters, e.g. `^~\&`
    pub fn to_msh2(&self) -> String {
        [self.component, self.repetition, self.escape, self.subcomponent]
            .iter()
            .collect()
    }
}
