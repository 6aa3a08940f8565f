//! Stream source backed by a JSON dump of an extraction result

use crate::extractor::models::ExtractedStreams;
use crate::extractor::traits::StreamSource;
use crate::utils::error::StreamError;
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Reads `ExtractedStreams` from a file instead of talking to a service
pub struct JsonStreamSource {
    path: PathBuf,
}

impl JsonStreamSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StreamSource for JsonStreamSource {
    fn id(&self) -> &'static str {
        "json-file"
    }

    async fn extract_streams(&self, url: &str) -> Result<ExtractedStreams> {
        debug!("Loading streams for {} from {}", url, self.path.display());

        let json_str = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(StreamError::IoError)?;
        let streams: ExtractedStreams =
            serde_json::from_str(&json_str).map_err(StreamError::SerializationError)?;

        if streams.is_empty() {
            return Err(StreamError::NoStreams(self.path.display().to_string()).into());
        }

        info!(
            "Loaded {} video, {} video-only, {} audio and {} subtitle streams",
            streams.video_streams.len(),
            streams.video_only_streams.len(),
            streams.audio_streams.len(),
            streams.subtitles.len()
        );
        Ok(streams)
    }
}
