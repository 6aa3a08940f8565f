use crate::extractor::models::{AudioStream, ExtractedStreams};
use anyhow::Result;
use async_trait::async_trait;

/// Core trait for anything that produces stream lists
///
/// This trait isolates the selection engine from the specific extraction method
/// (a service extractor, a cached JSON dump, a test fixture, etc.).
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., "json-file")
    fn id(&self) -> &'static str;

    /// Extracts every stream available for the given item
    async fn extract_streams(&self, url: &str) -> Result<ExtractedStreams>;

    /// Audio streams (usually calls extract_streams internally)
    async fn audio_streams(&self, url: &str) -> Result<Vec<AudioStream>> {
        let streams = self.extract_streams(url).await?;
        Ok(streams.audio_streams)
    }
}
