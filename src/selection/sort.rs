//! Sorting and filtering of stream lists

use crate::extractor::format::MediaFormat;
use crate::extractor::models::{DeliveryMethod, Stream, VideoStream};
use crate::selection::ranking::video_rank;
use crate::selection::resolution::{is_high_resolution, resolution_sort_key, HIGH_RESOLUTIONS};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Format ids the YouTube player can actually play
pub const SUPPORTED_ITAG_IDS: [u32; 47] = [
    17, 36, // video v3GPP
    18, 34, 35, 59, 78, 22, 37, 38, // video MPEG4
    43, 44, 45, 46, // video webm
    171, 172, 139, 140, 141, 249, 250, 251, // audio
    160, 133, 134, 135, 212, 136, 298, 137, 299, 266, // video only
    278, 242, 243, 244, 245, 246, 247, 248, 271, 272, 302, 303, 308, 313, 315,
];

const YOUTUBE_SERVICE: &str = "youtube";

/// Resolution first, then container quality
pub fn compare_video_streams(a: &VideoStream, b: &VideoStream) -> Ordering {
    resolution_sort_key(&a.resolution)
        .cmp(&resolution_sort_key(&b.resolution))
        .then_with(|| video_rank(a.format).cmp(&video_rank(b.format)))
}

/// Sort in place, best first unless `ascending`
///
/// The sort is stable: streams comparing equal keep their relative order in both
/// directions.
pub fn sort_streams(streams: &mut [VideoStream], ascending: bool) {
    if ascending {
        streams.sort_by(compare_video_streams);
    } else {
        streams.sort_by(|a, b| compare_video_streams(b, a));
    }
}

fn filter_streams<S, F>(streams: &[S], keep: F) -> Vec<S>
where
    S: Stream + Clone,
    F: Fn(&S) -> bool,
{
    streams.iter().filter(|s| keep(*s)).cloned().collect()
}

pub fn streams_of_delivery<S: Stream + Clone>(streams: &[S], method: DeliveryMethod) -> Vec<S> {
    filter_streams(streams, |s| s.delivery_method() == method)
}

pub fn url_and_non_torrent_streams<S: Stream + Clone>(streams: &[S]) -> Vec<S> {
    filter_streams(streams, |s| s.is_url() && s.delivery_method() != DeliveryMethod::Torrent)
}

pub fn non_torrent_streams<S: Stream + Clone>(streams: &[S]) -> Vec<S> {
    filter_streams(streams, |s| s.delivery_method() != DeliveryMethod::Torrent)
}

fn is_hls_opus<S: Stream>(stream: &S) -> bool {
    stream.delivery_method() == DeliveryMethod::Hls && stream.format() == Some(MediaFormat::Opus)
}

/// Streams the player can handle
///
/// Torrents and HLS Opus streams are dropped. For YouTube, streams whose itag is known
/// but not in [`SUPPORTED_ITAG_IDS`] are dropped as well.
pub fn playable_streams<S: Stream + Clone>(streams: &[S], service: Option<&str>) -> Vec<S> {
    let youtube = service.is_some_and(|s| s.eq_ignore_ascii_case(YOUTUBE_SERVICE));
    filter_streams(streams, |s| {
        if s.delivery_method() == DeliveryMethod::Torrent || is_hls_opus(s) {
            return false;
        }
        match s.itag() {
            Some(itag) if youtube => SUPPORTED_ITAG_IDS.contains(&itag),
            _ => true,
        }
    })
}

/// Merge muxed and video-only streams into one sorted list with a stream per label
///
/// Streams from the preferred list win over the other list, and a stream in
/// `default_format` wins over any other format at the same label.
pub fn sorted_video_streams(
    default_format: Option<MediaFormat>,
    show_higher_resolutions: bool,
    video_streams: &[VideoStream],
    video_only_streams: &[VideoStream],
    ascending: bool,
    prefer_video_only: bool,
) -> Vec<VideoStream> {
    let ordered: [&[VideoStream]; 2] = if prefer_video_only {
        [video_streams, video_only_streams]
    } else {
        [video_only_streams, video_streams]
    };

    let candidates: Vec<&VideoStream> = ordered
        .iter()
        .flat_map(|list| list.iter())
        .filter(|s| show_higher_resolutions || !is_high_resolution(&s.resolution, &HIGH_RESOLUTIONS))
        .collect();

    // label -> position in `merged`, first insertion order
    let mut by_label: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<VideoStream> = Vec::new();
    let mut put = |stream: &VideoStream| match by_label.get(&stream.resolution) {
        Some(&i) => merged[i] = stream.clone(),
        None => {
            by_label.insert(stream.resolution.clone(), merged.len());
            merged.push(stream.clone());
        }
    };

    for stream in &candidates {
        put(*stream);
    }
    if default_format.is_some() {
        for stream in candidates.iter().filter(|s| s.format == default_format) {
            put(*stream);
        }
    }

    sort_streams(&mut merged, ascending);
    merged
}
