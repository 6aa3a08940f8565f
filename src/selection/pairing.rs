//! Pairing video-only streams with a compatible audio stream

use crate::extractor::format::MediaFormat;
use crate::extractor::models::{AudioStream, VideoStream};
use crate::metadata::wrapper::{StreamHandle, StreamMetadataWrapper, StreamSize};
use crate::selection::audio::{pick_by_highest_rank, AudioFormatComparator, AudioSelectionConfig};
use std::collections::BTreeMap;
use tracing::debug;

/// Best audio stream that can be muxed with `video`
///
/// WebM video takes WebM audio (Vorbis or Opus), MPEG-4 video takes M4A. Other
/// containers have no partner.
pub fn audio_stream_for<'a>(
    video: &VideoStream,
    audio_streams: &'a [AudioStream],
    config: &AudioSelectionConfig,
) -> Option<&'a AudioStream> {
    let (preferred, compatible): (MediaFormat, &[MediaFormat]) = match video.format? {
        MediaFormat::Webm => (MediaFormat::Webma, &[MediaFormat::Webma, MediaFormat::WebmaOpus]),
        MediaFormat::Mpeg4 => (MediaFormat::M4a, &[MediaFormat::M4a]),
        _ => return None,
    };

    let candidates: Vec<&AudioStream> = audio_streams
        .iter()
        .filter(|a| a.format.is_some_and(|f| compatible.contains(&f)))
        .collect();

    let cmp = AudioFormatComparator::new(Some(preferred), config.limit_data_usage);
    pick_by_highest_rank(&candidates, |a, b| cmp.compare(a, b)).map(|i| candidates[i])
}

/// An audio stream chosen for one video-only stream
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryStreamBinding {
    handle: StreamHandle,
    stream: AudioStream,
}

impl SecondaryStreamBinding {
    /// # Panics
    ///
    /// Panics if `stream` is not part of `audio`.
    pub fn new(audio: &StreamMetadataWrapper<AudioStream>, stream: &AudioStream) -> Self {
        let handle = audio
            .handle_of(stream)
            .unwrap_or_else(|| panic!("audio stream {} is not in the wrapper", stream.content));
        Self {
            handle,
            stream: stream.clone(),
        }
    }

    pub fn handle(&self) -> StreamHandle {
        self.handle
    }

    pub fn stream(&self) -> &AudioStream {
        &self.stream
    }

    pub fn size(&self, audio: &StreamMetadataWrapper<AudioStream>) -> StreamSize {
        audio.size(self.handle)
    }
}

/// Bindings for a video wrapper, keyed by position
#[derive(Debug, Clone, Default)]
pub struct SecondaryStreams {
    bindings: BTreeMap<usize, SecondaryStreamBinding>,
}

impl SecondaryStreams {
    pub fn insert(&mut self, position: usize, binding: SecondaryStreamBinding) {
        self.bindings.insert(position, binding);
    }

    pub fn get(&self, position: usize) -> Option<&SecondaryStreamBinding> {
        self.bindings.get(&position)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &SecondaryStreamBinding)> {
        self.bindings.iter().map(|(p, b)| (*p, b))
    }

    /// Video size plus audio size, only when both are known and non-zero
    pub fn combined_size(
        &self,
        video: &StreamMetadataWrapper<VideoStream>,
        audio: &StreamMetadataWrapper<AudioStream>,
        position: usize,
    ) -> Option<u64> {
        let binding = self.get(position)?;
        let video_size = video.size(video.handle_at(position)?).bytes().filter(|s| *s > 0)?;
        let audio_size = binding.size(audio).bytes().filter(|s| *s > 0)?;
        Some(video_size + audio_size)
    }

    /// Whether some video-only stream would play without sound
    pub fn has_unpaired_video_only(&self, video: &StreamMetadataWrapper<VideoStream>) -> bool {
        video
            .streams()
            .enumerate()
            .any(|(position, stream)| stream.is_video_only && !self.bindings.contains_key(&position))
    }
}

/// Bind an audio stream to every video-only stream that has a compatible one
pub fn pair_video_only_streams(
    video: &StreamMetadataWrapper<VideoStream>,
    audio: &StreamMetadataWrapper<AudioStream>,
    config: &AudioSelectionConfig,
) -> SecondaryStreams {
    let audio_streams: Vec<AudioStream> = audio.streams().cloned().collect();
    let mut secondary = SecondaryStreams::default();

    for (position, stream) in video.streams().enumerate() {
        if !stream.is_video_only {
            continue;
        }
        match audio_stream_for(stream, &audio_streams, config) {
            Some(audio_stream) => {
                secondary.insert(position, SecondaryStreamBinding::new(audio, audio_stream));
            }
            None => match stream.format {
                Some(format) => debug!("No audio stream candidates for video format {}", format.name()),
                None => debug!("No audio stream candidates for unknown video format"),
            },
        }
    }
    secondary
}
