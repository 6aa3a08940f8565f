//! Data structures for extracted stream descriptors

use crate::extractor::format::MediaFormat;
use crate::utils::locale;
use serde::{Deserialize, Serialize};

/// How a stream is delivered to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryMethod {
    #[default]
    ProgressiveHttp,
    Hls,
    Dash,
    Ss,
    Torrent,
}

/// Classification of an audio track
///
/// Declaration order is the natural order used when sorting tracks by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioTrackType {
    Original,
    Dubbed,
    Descriptive,
}

/// Fields shared by every kind of stream
pub trait Stream {
    fn format(&self) -> Option<MediaFormat>;
    /// URL (or manifest content) of the stream
    fn content(&self) -> &str;
    fn delivery_method(&self) -> DeliveryMethod;
    fn is_url(&self) -> bool;
    /// Service-specific format id, if the service reports one
    fn itag(&self) -> Option<u32> {
        None
    }
}

fn default_true() -> bool {
    true
}

/// Video stream, with or without an audio track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStream {
    #[serde(alias = "url")]
    pub content: String,
    #[serde(default)]
    pub format: Option<MediaFormat>,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    #[serde(default = "default_true")]
    pub is_url: bool,
    /// Resolution label such as "720p" or "1080p60"
    pub resolution: String,
    #[serde(default)]
    pub is_video_only: bool,
    #[serde(default)]
    pub itag: Option<u32>,
}

impl VideoStream {
    pub fn new(content: impl Into<String>, format: Option<MediaFormat>, resolution: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            format,
            delivery_method: DeliveryMethod::ProgressiveHttp,
            is_url: true,
            resolution: resolution.into(),
            is_video_only: false,
            itag: None,
        }
    }

    pub fn video_only(mut self) -> Self {
        self.is_video_only = true;
        self
    }

    pub fn with_delivery(mut self, delivery_method: DeliveryMethod) -> Self {
        self.delivery_method = delivery_method;
        self
    }

    pub fn with_itag(mut self, itag: u32) -> Self {
        self.itag = Some(itag);
        self
    }
}

/// Audio-only stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStream {
    #[serde(alias = "url")]
    pub content: String,
    #[serde(default)]
    pub format: Option<MediaFormat>,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    #[serde(default = "default_true")]
    pub is_url: bool,
    /// Average bitrate in kbps, 0 or negative when unknown
    #[serde(default)]
    pub average_bitrate: i32,
    /// Opaque track id; absent or empty means the track is unknown
    #[serde(default)]
    pub audio_track_id: Option<String>,
    #[serde(default)]
    pub audio_track_type: Option<AudioTrackType>,
    /// Language tag of the track, e.g. "en-US"
    #[serde(default)]
    pub audio_locale: Option<String>,
    #[serde(default)]
    pub itag: Option<u32>,
}

impl AudioStream {
    pub fn new(content: impl Into<String>, format: Option<MediaFormat>, average_bitrate: i32) -> Self {
        Self {
            content: content.into(),
            format,
            delivery_method: DeliveryMethod::ProgressiveHttp,
            is_url: true,
            average_bitrate,
            audio_track_id: None,
            audio_track_type: None,
            audio_locale: None,
            itag: None,
        }
    }

    pub fn with_track(
        mut self,
        track_id: impl Into<String>,
        track_type: Option<AudioTrackType>,
        locale: Option<&str>,
    ) -> Self {
        self.audio_track_id = Some(track_id.into());
        self.audio_track_type = track_type;
        self.audio_locale = locale.map(str::to_string);
        self
    }

    pub fn with_delivery(mut self, delivery_method: DeliveryMethod) -> Self {
        self.delivery_method = delivery_method;
        self
    }

    /// Track id with "unknown" folded to the empty string
    pub fn track_key(&self) -> &str {
        self.audio_track_id.as_deref().unwrap_or("")
    }

    /// Bitrate label such as "128kbps"
    pub fn quality_label(&self) -> String {
        if self.average_bitrate > 0 {
            format!("{}kbps", self.average_bitrate)
        } else {
            "Unknown quality".to_string()
        }
    }
}

/// Subtitle track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleStream {
    #[serde(alias = "url")]
    pub content: String,
    #[serde(default)]
    pub format: Option<MediaFormat>,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    #[serde(default = "default_true")]
    pub is_url: bool,
    pub language_tag: String,
    #[serde(default)]
    pub is_auto_generated: bool,
}

impl SubtitleStream {
    pub fn quality_label(&self) -> String {
        let name = locale::display_name(&self.language_tag);
        if self.is_auto_generated {
            format!("{} (auto-generated)", name)
        } else {
            name
        }
    }
}

/// Any extracted stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StreamDescriptor {
    Video(VideoStream),
    Audio(AudioStream),
    Subtitle(SubtitleStream),
}

impl StreamDescriptor {
    /// Quality column shown next to the format in pickers
    pub fn quality_label(&self) -> String {
        match self {
            StreamDescriptor::Video(v) => v.resolution.clone(),
            StreamDescriptor::Audio(a) => a.quality_label(),
            StreamDescriptor::Subtitle(s) => s.quality_label(),
        }
    }
}

macro_rules! impl_stream {
    ($ty:ty, itag) => {
        impl Stream for $ty {
            fn format(&self) -> Option<MediaFormat> {
                self.format
            }
            fn content(&self) -> &str {
                &self.content
            }
            fn delivery_method(&self) -> DeliveryMethod {
                self.delivery_method
            }
            fn is_url(&self) -> bool {
                self.is_url
            }
            fn itag(&self) -> Option<u32> {
                self.itag
            }
        }
    };
    ($ty:ty) => {
        impl Stream for $ty {
            fn format(&self) -> Option<MediaFormat> {
                self.format
            }
            fn content(&self) -> &str {
                &self.content
            }
            fn delivery_method(&self) -> DeliveryMethod {
                self.delivery_method
            }
            fn is_url(&self) -> bool {
                self.is_url
            }
        }
    };
}

impl_stream!(VideoStream, itag);
impl_stream!(AudioStream, itag);
impl_stream!(SubtitleStream);

impl Stream for StreamDescriptor {
    fn format(&self) -> Option<MediaFormat> {
        match self {
            StreamDescriptor::Video(v) => v.format,
            StreamDescriptor::Audio(a) => a.format,
            StreamDescriptor::Subtitle(s) => s.format,
        }
    }

    fn content(&self) -> &str {
        match self {
            StreamDescriptor::Video(v) => &v.content,
            StreamDescriptor::Audio(a) => &a.content,
            StreamDescriptor::Subtitle(s) => &s.content,
        }
    }

    fn delivery_method(&self) -> DeliveryMethod {
        match self {
            StreamDescriptor::Video(v) => v.delivery_method,
            StreamDescriptor::Audio(a) => a.delivery_method,
            StreamDescriptor::Subtitle(s) => s.delivery_method,
        }
    }

    fn is_url(&self) -> bool {
        match self {
            StreamDescriptor::Video(v) => v.is_url,
            StreamDescriptor::Audio(a) => a.is_url,
            StreamDescriptor::Subtitle(s) => s.is_url,
        }
    }

    fn itag(&self) -> Option<u32> {
        match self {
            StreamDescriptor::Video(v) => v.itag,
            StreamDescriptor::Audio(a) => a.itag,
            StreamDescriptor::Subtitle(_) => None,
        }
    }
}

/// Everything an extractor returns for one item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedStreams {
    /// Service the streams come from, e.g. "youtube"
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub video_streams: Vec<VideoStream>,
    #[serde(default)]
    pub video_only_streams: Vec<VideoStream>,
    #[serde(default)]
    pub audio_streams: Vec<AudioStream>,
    #[serde(default)]
    pub subtitles: Vec<SubtitleStream>,
}

impl ExtractedStreams {
    pub fn is_empty(&self) -> bool {
        self.video_streams.is_empty()
            && self.video_only_streams.is_empty()
            && self.audio_streams.is_empty()
            && self.subtitles.is_empty()
    }
}
