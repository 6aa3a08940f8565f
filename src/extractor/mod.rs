pub mod format;
pub mod json;
pub mod models;
pub mod traits;

pub use format::MediaFormat;
pub use json::JsonStreamSource;
pub use models::{
    AudioStream, AudioTrackType, DeliveryMethod, ExtractedStreams, Stream, StreamDescriptor,
    SubtitleStream, VideoStream,
};
pub use traits::StreamSource;
