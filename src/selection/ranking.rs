//! Static rank tables for containers and audio track types
//!
//! Every table lists entries from worst to best, so a larger index is a better rank.

use crate::extractor::format::MediaFormat;
use crate::extractor::models::AudioTrackType;

/// Ordered list of formats, worst first
#[derive(Debug, Clone, Copy)]
pub struct FormatRanking {
    order: &'static [MediaFormat],
}

impl FormatRanking {
    /// Video containers by quality
    pub const VIDEO_QUALITY: FormatRanking = FormatRanking {
        order: &[MediaFormat::V3gpp, MediaFormat::Webm, MediaFormat::Mpeg4],
    };

    /// Audio containers by quality
    pub const AUDIO_QUALITY: FormatRanking = FormatRanking {
        order: &[MediaFormat::Mp3, MediaFormat::Webma, MediaFormat::M4a],
    };

    /// Audio containers by efficiency, used while data saving is active
    pub const AUDIO_EFFICIENCY: FormatRanking = FormatRanking {
        order: &[MediaFormat::Mp3, MediaFormat::M4a, MediaFormat::Webma],
    };

    /// Rank of `format`, -1 when it is absent or not in the table
    pub fn rank(&self, format: Option<MediaFormat>) -> i32 {
        format
            .and_then(|f| self.order.iter().position(|o| *o == f))
            .map_or(-1, |i| i as i32)
    }

    pub fn formats(&self) -> &'static [MediaFormat] {
        self.order
    }
}

pub fn video_rank(format: Option<MediaFormat>) -> i32 {
    FormatRanking::VIDEO_QUALITY.rank(format)
}

pub fn audio_ranking(use_efficiency: bool) -> FormatRanking {
    if use_efficiency {
        FormatRanking::AUDIO_EFFICIENCY
    } else {
        FormatRanking::AUDIO_QUALITY
    }
}

pub fn audio_rank(format: Option<MediaFormat>, use_efficiency: bool) -> i32 {
    audio_ranking(use_efficiency).rank(format)
}

/// Ordered list of audio track types, worst first
#[derive(Debug, Clone, Copy)]
pub struct TrackTypeRanking {
    order: &'static [AudioTrackType],
}

impl TrackTypeRanking {
    pub const DEFAULT: TrackTypeRanking = TrackTypeRanking {
        order: &[
            AudioTrackType::Descriptive,
            AudioTrackType::Dubbed,
            AudioTrackType::Original,
        ],
    };

    pub const DESCRIPTIVE_FIRST: TrackTypeRanking = TrackTypeRanking {
        order: &[
            AudioTrackType::Original,
            AudioTrackType::Dubbed,
            AudioTrackType::Descriptive,
        ],
    };

    /// `None` for an absent type, which ranks below every present one
    pub fn rank(&self, track_type: Option<AudioTrackType>) -> Option<usize> {
        track_type.and_then(|t| self.order.iter().position(|o| *o == t))
    }
}

pub fn track_type_rank(track_type: Option<AudioTrackType>, prefer_descriptive: bool) -> Option<usize> {
    if prefer_descriptive {
        TrackTypeRanking::DESCRIPTIVE_FIRST.rank(track_type)
    } else {
        TrackTypeRanking::DEFAULT.rank(track_type)
    }
}
