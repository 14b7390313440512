//! HL7 v2 wire format handling
//!
//! Leaf components of the comparison pipeline:
//!
//! - [`splitter`] - restores missing segment terminators
//! - [`parser`] - parses text into [`Message`] / [`Segment`] / [`Field`]
//! - [`extract`] - groups segments by configured names
//! - [`encoding`] - encoding characters and delimiters
//!
//! ```rust
//! use hl7diff::domain::SegmentName;
//! use hl7diff::hl7::{extract_segments, parse_message, SegmentSplitter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let names = vec![SegmentName::new("MSH")?, SegmentName::new("PID")?];
//! let splitter = SegmentSplitter::new(names.clone());
//!
//! let repaired = splitter.split("MSH|^~\\&|APPPID|1||123");
//! let message = parse_message(&repaired)?;
//! let groups = extract_segments(&message, &names);
//! assert_eq!(groups.get(&names[1]).len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod encoding;
pub mod extract;
pub mod message;
pub mod parser;
pub mod splitter;

pub use encoding::{Delimiter, EncodingCharacters, SEGMENT_TERMINATOR};
pub use extract::{extract_segments, SegmentGroups};
pub use message::{Field, Message, Segment};
pub use parser::{parse_message, parse_segment};
pub use splitter::SegmentSplitter;
