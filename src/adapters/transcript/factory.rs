//! Transcript source factory
//!
//! Creates transcript sources from the `[input.*]` configuration sections.

use super::file::{FileTranscriptSource, TranscriptFormat};
use super::traits::TranscriptSource;
use crate::config::schema::TranscriptConfig;
use crate::domain::Result;
use std::str::FromStr;
use std::sync::Arc;

/// Create a transcript source for one side of the comparison
///
/// # Errors
///
/// Returns an error if the configured format is not supported
pub fn create_transcript_source(
    config: &TranscriptConfig,
) -> Result<Arc<dyn TranscriptSource + Send + Sync>> {
    let format = TranscriptFormat::from_str(&config.format)?;

    tracing::debug!(path = %config.path, format = %format, "Creating file transcript source");

    Ok(Arc::new(FileTranscriptSource::new(&config.path, format))
        as Arc<dyn TranscriptSource + Send + Sync>)
}
