//! Streampicker library

pub mod extractor;
pub mod metadata;
pub mod selection;
pub mod utils;

// Re-export main types for easier use
pub use extractor::{
    AudioStream, AudioTrackType, DeliveryMethod, ExtractedStreams, JsonStreamSource, MediaFormat,
    Stream, StreamDescriptor, StreamSource, SubtitleStream, VideoStream,
};
pub use metadata::{HeadProbe, HttpHeadProbe, ProbeHeaders, StreamHandle, StreamMetadataWrapper, StreamSize};
pub use selection::{AudioSelectionConfig, SecondaryStreams};
pub use utils::{Preferences, StreamError};
