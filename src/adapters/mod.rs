//! External system integrations for hl7diff.
//!
//! - [`transcript`] - Transcript sources (files, in-memory fixtures)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate I/O from the
//! comparison core. The coordinator only sees the
//! [`TranscriptSource`](transcript::TranscriptSource) trait, so tests can
//! substitute in-memory transcripts:
//!
//! ```rust
//! use hl7diff::adapters::transcript::{InMemoryTranscriptSource, TranscriptSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = InMemoryTranscriptSource::from_messages("output", ["MSH|^~\\&|A\rPID|1||123"]);
//! let messages = source.load().await?;
//! assert_eq!(messages.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod transcript;
