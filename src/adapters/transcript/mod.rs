//! Transcript loading
//!
//! A transcript is an ordered list of raw HL7 messages, one per record. The
//! [`TranscriptSource`] trait abstracts over where it is stored.

pub mod factory;
pub mod file;
pub mod memory;
pub mod traits;

pub use factory::create_transcript_source;
pub use file::{parse_transcript, FileTranscriptSource, TranscriptFormat};
pub use memory::InMemoryTranscriptSource;
pub use traits::TranscriptSource;
