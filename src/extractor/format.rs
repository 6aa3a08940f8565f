//! Known media containers and codecs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media format of a stream
///
/// Several variants share an id (`WEBMA`/`WEBMA_OPUS`, `AIFF`/`AIF`): they are the same
/// container reported under different names or suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaFormat {
    #[serde(rename = "MPEG_4")]
    Mpeg4,
    #[serde(rename = "V3GPP", alias = "v3GPP")]
    V3gpp,
    #[serde(rename = "WEBM")]
    Webm,
    #[serde(rename = "M4A")]
    M4a,
    #[serde(rename = "WEBMA")]
    Webma,
    #[serde(rename = "MP3")]
    Mp3,
    #[serde(rename = "MP2")]
    Mp2,
    #[serde(rename = "OPUS")]
    Opus,
    #[serde(rename = "OGG")]
    Ogg,
    #[serde(rename = "WEBMA_OPUS")]
    WebmaOpus,
    #[serde(rename = "AIFF")]
    Aiff,
    #[serde(rename = "AIF")]
    Aif,
    #[serde(rename = "WAV")]
    Wav,
    #[serde(rename = "FLAC")]
    Flac,
    #[serde(rename = "ALAC")]
    Alac,
    #[serde(rename = "VTT")]
    Vtt,
    #[serde(rename = "TTML")]
    Ttml,
    #[serde(rename = "TRANSCRIPT1")]
    Transcript1,
    #[serde(rename = "TRANSCRIPT2")]
    Transcript2,
    #[serde(rename = "TRANSCRIPT3")]
    Transcript3,
    #[serde(rename = "SRT")]
    Srt,
}

impl MediaFormat {
    /// Every format, in lookup order
    pub const ALL: [MediaFormat; 21] = [
        MediaFormat::Mpeg4,
        MediaFormat::V3gpp,
        MediaFormat::Webm,
        MediaFormat::M4a,
        MediaFormat::Webma,
        MediaFormat::Mp3,
        MediaFormat::Mp2,
        MediaFormat::Opus,
        MediaFormat::Ogg,
        MediaFormat::WebmaOpus,
        MediaFormat::Aiff,
        MediaFormat::Aif,
        MediaFormat::Wav,
        MediaFormat::Flac,
        MediaFormat::Alac,
        MediaFormat::Vtt,
        MediaFormat::Ttml,
        MediaFormat::Transcript1,
        MediaFormat::Transcript2,
        MediaFormat::Transcript3,
        MediaFormat::Srt,
    ];

    /// Numeric format id
    pub fn id(self) -> u32 {
        match self {
            MediaFormat::Mpeg4 => 0x0,
            MediaFormat::V3gpp => 0x10,
            MediaFormat::Webm => 0x20,
            MediaFormat::M4a => 0x100,
            MediaFormat::Webma | MediaFormat::WebmaOpus => 0x200,
            MediaFormat::Mp3 => 0x300,
            MediaFormat::Mp2 => 0x310,
            MediaFormat::Opus => 0x400,
            MediaFormat::Ogg => 0x500,
            MediaFormat::Aiff | MediaFormat::Aif => 0x600,
            MediaFormat::Wav => 0x700,
            MediaFormat::Flac => 0x800,
            MediaFormat::Alac => 0x900,
            MediaFormat::Vtt => 0x1000,
            MediaFormat::Ttml => 0x2000,
            MediaFormat::Transcript1 => 0x3000,
            MediaFormat::Transcript2 => 0x4000,
            MediaFormat::Transcript3 => 0x5000,
            MediaFormat::Srt => 0x6000,
        }
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            MediaFormat::Mpeg4 => "MPEG-4",
            MediaFormat::V3gpp => "3GPP",
            MediaFormat::Webm | MediaFormat::Webma => "WebM",
            MediaFormat::M4a => "m4a",
            MediaFormat::Mp3 => "MP3",
            MediaFormat::Mp2 => "MP2",
            MediaFormat::Opus => "opus",
            MediaFormat::Ogg => "ogg",
            MediaFormat::WebmaOpus => "WebM Opus",
            MediaFormat::Aiff | MediaFormat::Aif => "AIFF",
            MediaFormat::Wav => "WAV",
            MediaFormat::Flac => "FLAC",
            MediaFormat::Alac => "ALAC",
            MediaFormat::Vtt => "WebVTT",
            MediaFormat::Ttml => "Timed Text Markup Language",
            MediaFormat::Transcript1 => "TranScript v1",
            MediaFormat::Transcript2 => "TranScript v2",
            MediaFormat::Transcript3 => "TranScript v3",
            MediaFormat::Srt => "SubRip file format",
        }
    }

    /// File extension without the leading dot
    pub fn suffix(self) -> &'static str {
        match self {
            MediaFormat::Mpeg4 => "mp4",
            MediaFormat::V3gpp => "3gp",
            MediaFormat::Webm | MediaFormat::Webma | MediaFormat::WebmaOpus => "webm",
            MediaFormat::M4a => "m4a",
            MediaFormat::Mp3 => "mp3",
            MediaFormat::Mp2 => "mp2",
            MediaFormat::Opus => "opus",
            MediaFormat::Ogg => "ogg",
            MediaFormat::Aiff => "aiff",
            MediaFormat::Aif => "aif",
            MediaFormat::Wav => "wav",
            MediaFormat::Flac => "flac",
            MediaFormat::Alac => "alac",
            MediaFormat::Vtt => "vtt",
            MediaFormat::Ttml => "ttml",
            MediaFormat::Transcript1 => "srv1",
            MediaFormat::Transcript2 => "srv2",
            MediaFormat::Transcript3 => "srv3",
            MediaFormat::Srt => "srt",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            MediaFormat::Mpeg4 => "video/mp4",
            MediaFormat::V3gpp => "video/3gpp",
            MediaFormat::Webm => "video/webm",
            MediaFormat::M4a => "audio/mp4",
            MediaFormat::Webma | MediaFormat::WebmaOpus => "audio/webm",
            MediaFormat::Mp3 | MediaFormat::Mp2 => "audio/mpeg",
            MediaFormat::Opus => "audio/opus",
            MediaFormat::Ogg => "audio/ogg",
            MediaFormat::Aiff | MediaFormat::Aif => "audio/aiff",
            MediaFormat::Wav => "audio/wav",
            MediaFormat::Flac => "audio/flac",
            MediaFormat::Alac => "audio/alac",
            MediaFormat::Vtt => "text/vtt",
            MediaFormat::Ttml => "application/ttml+xml",
            MediaFormat::Transcript1 | MediaFormat::Transcript2 | MediaFormat::Transcript3 => {
                "text/xml"
            }
            MediaFormat::Srt => "text/srt",
        }
    }

    /// First format using the given file suffix
    pub fn from_suffix(suffix: &str) -> Option<MediaFormat> {
        Self::ALL.iter().copied().find(|f| f.suffix() == suffix)
    }

    /// All formats sharing the given MIME type, in lookup order
    pub fn all_from_mime_type(mime_type: &str) -> Vec<MediaFormat> {
        Self::ALL
            .iter()
            .copied()
            .filter(|f| f.mime_type() == mime_type)
            .collect()
    }

    /// Map a settings value ("mp4", "webm", ...) to a format
    pub fn from_preference_key(key: &str) -> Option<MediaFormat> {
        match key {
            "webm" => Some(MediaFormat::Webm),
            "mp4" => Some(MediaFormat::Mpeg4),
            "3gp" => Some(MediaFormat::V3gpp),
            "webma" | "webm_audio" => Some(MediaFormat::Webma),
            "m4a" => Some(MediaFormat::M4a),
            _ => None,
        }
    }

    /// Label used in format pickers; opus-in-webm is shown as plain "opus"
    pub fn display_label(self) -> &'static str {
        match self {
            MediaFormat::WebmaOpus => "opus",
            other => other.name(),
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
