//! Choosing the default video stream for a preferred resolution and container

use crate::extractor::format::MediaFormat;
use crate::extractor::models::VideoStream;
use crate::selection::resolution::{compare_resolutions, strip_refresh_rate};
use crate::selection::sort::sort_streams;
use std::cmp::Ordering;
use tracing::trace;

/// Index of the stream to play by default
///
/// `streams` is sorted best first as a side effect, and the index refers to the sorted
/// list. Returns `None` only for an empty list; when nothing matches the target the best
/// stream (index 0) is picked.
pub fn default_resolution_index(
    target: &str,
    best_sentinel: &str,
    target_format: Option<MediaFormat>,
    streams: &mut [VideoStream],
) -> Option<usize> {
    if streams.is_empty() {
        return None;
    }

    sort_streams(streams, false);

    if target == best_sentinel {
        return Some(0);
    }

    match video_stream_index(target, target_format, streams) {
        Some(index) => Some(index),
        None => {
            trace!("No stream matches {}, using the best one", target);
            Some(0)
        }
    }
}

/// Locate the stream closest to `target`, trying in order:
///
/// 1. container and resolution match
/// 2. container and resolution match, ignoring the frame rate
/// 3. resolution match
/// 4. resolution match, ignoring the frame rate
/// 5. the first resolution below the target, ignoring the frame rate
///
/// The first stream satisfying a level is kept. With no `target_format` every stream
/// counts as a container match.
pub fn video_stream_index(
    target: &str,
    target_format: Option<MediaFormat>,
    streams: &[VideoStream],
) -> Option<usize> {
    let target_no_refresh = strip_refresh_rate(target);

    let mut full_match = None;
    let mut full_match_no_refresh = None;
    let mut resolution_match = None;
    let mut resolution_match_no_refresh = None;
    let mut lower_match_no_refresh = None;

    for (index, stream) in streams.iter().enumerate() {
        let format_matches = target_format.is_none() || stream.format == target_format;
        let resolution = stream.resolution.as_str();
        let resolution_no_refresh = strip_refresh_rate(resolution);

        let exact = resolution == target;
        let same_no_refresh = resolution_no_refresh == target_no_refresh;

        if format_matches && exact {
            full_match.get_or_insert(index);
        }
        if format_matches && same_no_refresh {
            full_match_no_refresh.get_or_insert(index);
        }
        if exact {
            resolution_match.get_or_insert(index);
        }
        if same_no_refresh {
            resolution_match_no_refresh.get_or_insert(index);
        }
        if compare_resolutions(&resolution_no_refresh, &target_no_refresh) == Ordering::Less {
            lower_match_no_refresh.get_or_insert(index);
        }
    }

    full_match
        .or(full_match_no_refresh)
        .or(resolution_match)
        .or(resolution_match_no_refresh)
        .or(lower_match_no_refresh)
}

/// Resolution to look for once a data limit is taken into account
///
/// The limit replaces the preference when the preference is `best_sentinel` or is not
/// below the limit.
pub fn effective_resolution<'a>(preferred: &'a str, best_sentinel: &str, limit: Option<&'a str>) -> &'a str {
    match limit {
        Some(limit)
            if preferred == best_sentinel
                || compare_resolutions(limit, preferred) != Ordering::Greater =>
        {
            limit
        }
        _ => preferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BEST: &str = "best";

    fn video(id: &str, format: MediaFormat, resolution: &str) -> VideoStream {
        VideoStream::new(id, Some(format), resolution)
    }

    fn combinations() -> Vec<VideoStream> {
        vec![
            video("mpeg_4-1080", MediaFormat::Mpeg4, "1080p"),
            video("mpeg_4-720_60", MediaFormat::Mpeg4, "720p60"),
            video("mpeg_4-720", MediaFormat::Mpeg4, "720p"),
            video("webm-480", MediaFormat::Webm, "480p"),
            video("mpeg_4-360", MediaFormat::Mpeg4, "360p"),
            video("webm-360", MediaFormat::Webm, "360p"),
            video("v3gpp-240_60", MediaFormat::V3gpp, "240p60"),
            video("webm-144", MediaFormat::Webm, "144p"),
        ]
    }

    #[test]
    fn test_exact_matches() {
        let list = combinations();
        assert_eq!(video_stream_index("720p60", Some(MediaFormat::Mpeg4), &list), Some(1));
        assert_eq!(video_stream_index("720p", Some(MediaFormat::Mpeg4), &list), Some(2));
    }

    #[test]
    fn test_match_ignoring_refresh() {
        let list = combinations();
        assert_eq!(video_stream_index("1080p60", Some(MediaFormat::Mpeg4), &list), Some(0));
        assert_eq!(video_stream_index("240p", Some(MediaFormat::V3gpp), &list), Some(6));
    }

    #[test]
    fn test_match_ignoring_format() {
        let list = combinations();
        assert_eq!(video_stream_index("720p60", Some(MediaFormat::Webm), &list), Some(1));
        assert_eq!(video_stream_index("720p", Some(MediaFormat::Webm), &list), Some(2));
        assert_eq!(video_stream_index("720p60", None, &list), Some(1));
        assert_eq!(video_stream_index("720p", None, &list), Some(2));
        assert_eq!(video_stream_index("1080p60", Some(MediaFormat::Webm), &list), Some(0));
        assert_eq!(video_stream_index("240p", Some(MediaFormat::Webm), &list), Some(6));
        assert_eq!(video_stream_index("240p", None, &list), Some(6));
    }

    #[test]
    fn test_closest_lower_resolution() {
        let list = combinations();
        for format in [Some(MediaFormat::Webm), Some(MediaFormat::Mpeg4), None] {
            assert_eq!(video_stream_index("200p", format, &list), Some(7));
            assert_eq!(video_stream_index("200p60", format, &list), Some(7));
        }
        assert_eq!(video_stream_index("100p", None, &list), None);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let list = vec![
            video("first", MediaFormat::Mpeg4, "720p"),
            video("second", MediaFormat::Mpeg4, "720p"),
        ];
        assert_eq!(video_stream_index("720p", Some(MediaFormat::Mpeg4), &list), Some(0));
    }

    #[test]
    fn test_default_index_prefers_format_then_refresh() {
        let mut streams = vec![
            video("webm-720", MediaFormat::Webm, "720p"),
            video("mp4-720-60", MediaFormat::Mpeg4, "720p60"),
            video("mp4-480", MediaFormat::Mpeg4, "480p"),
        ];
        let index = default_resolution_index("720p60", BEST, Some(MediaFormat::Mpeg4), &mut streams).unwrap();
        assert_eq!(streams[index].content, "mp4-720-60");

        let index = default_resolution_index("720p60", BEST, Some(MediaFormat::Webm), &mut streams).unwrap();
        assert_eq!(streams[index].content, "webm-720");
    }

    #[test]
    fn test_default_index_best_and_empty() {
        let mut streams = vec![
            video("480", MediaFormat::Mpeg4, "480p"),
            video("720", MediaFormat::Webm, "720p"),
            video("1080", MediaFormat::Mpeg4, "1080p"),
        ];
        assert_eq!(default_resolution_index(BEST, BEST, Some(MediaFormat::Mpeg4), &mut streams), Some(0));
        let order: Vec<&str> = streams.iter().map(|s| s.resolution.as_str()).collect();
        assert_eq!(order, ["1080p", "720p", "480p"]);

        let mut empty: Vec<VideoStream> = Vec::new();
        assert_eq!(default_resolution_index("720p", BEST, None, &mut empty), None);
    }

    #[test]
    fn test_default_index_falls_back_to_best() {
        let mut streams = vec![
            video("480", MediaFormat::Mpeg4, "480p"),
            video("1080", MediaFormat::Mpeg4, "1080p"),
        ];
        assert_eq!(default_resolution_index("4k", BEST, Some(MediaFormat::Mpeg4), &mut streams), Some(0));
        assert_eq!(streams[0].resolution, "1080p");
    }

    #[test]
    fn test_effective_resolution() {
        assert_eq!(effective_resolution("1080p", BEST, None), "1080p");
        assert_eq!(effective_resolution(BEST, BEST, Some("480p")), "480p");
        assert_eq!(effective_resolution("1080p", BEST, Some("480p")), "480p");
        assert_eq!(effective_resolution("480p", BEST, Some("480p")), "480p");
        assert_eq!(effective_resolution("360p", BEST, Some("480p")), "360p");
        assert_eq!(effective_resolution("?", BEST, Some("480p")), "?");
    }
}
