//! Transcript source abstraction
//!
//! The comparison pipeline only needs a list of raw message strings per
//! side. Sources hide where those strings come from.

use crate::domain::Result;
use async_trait::async_trait;

/// A provider of raw HL7 message strings, one per record
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Loads every record of the transcript, in transcript order
    ///
    /// # Errors
    ///
    /// Returns an error if the transcript cannot be read or does not match
    /// its declared format.
    async fn load(&self) -> Result<Vec<String>>;

    /// Human-readable origin of the transcript, used in logs and reports
    fn describe(&self) -> String;
}
