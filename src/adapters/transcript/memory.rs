//! In-memory transcript source

use super::traits::TranscriptSource;
use crate::domain::Result;
use async_trait::async_trait;

/// Serves a fixed list of messages; used by tests and library callers that
/// already hold their transcripts
#[derive(Debug, Clone)]
pub struct InMemoryTranscriptSource {
    name: String,
    messages: Vec<String>,
}

impl InMemoryTranscriptSource {
    pub fn new(name: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            name: name.into(),
            messages,
        }
    }

    /// Builds a source from string slices
    pub fn from_messages<I, S>(name: impl Into<String>, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, messages.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TranscriptSource for InMemoryTranscriptSource {
    async fn load(&self) -> Result<Vec<String>> {
        Ok(self.messages.clone())
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }
}
