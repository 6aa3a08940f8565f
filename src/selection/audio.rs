//! Ranking of audio streams and tracks

use crate::extractor::format::MediaFormat;
use crate::extractor::models::{AudioStream, AudioTrackType, DeliveryMethod};
use crate::utils::locale::{self, ENGLISH};
use crate::selection::ranking::{audio_ranking, track_type_rank, FormatRanking};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Audio preferences, resolved once per selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSelectionConfig {
    /// Language tag the user wants to hear, e.g. "en" or "de-DE"
    pub preferred_language: String,
    pub prefer_original_audio: bool,
    pub prefer_descriptive_audio: bool,
    pub preferred_format: Option<MediaFormat>,
    /// Prefer small streams and efficient containers
    pub limit_data_usage: bool,
}

impl Default for AudioSelectionConfig {
    fn default() -> Self {
        Self {
            preferred_language: "en".to_string(),
            prefer_original_audio: false,
            prefer_descriptive_audio: false,
            preferred_format: None,
            limit_data_usage: false,
        }
    }
}

/// Orders streams of one track; the maximum is the stream to play
#[derive(Debug, Clone, Copy)]
pub struct AudioFormatComparator {
    preferred_format: Option<MediaFormat>,
    limit_data_usage: bool,
    ranking: FormatRanking,
}

impl AudioFormatComparator {
    pub fn new(preferred_format: Option<MediaFormat>, limit_data_usage: bool) -> Self {
        Self {
            preferred_format,
            limit_data_usage,
            ranking: audio_ranking(limit_data_usage),
        }
    }

    pub fn from_config(config: &AudioSelectionConfig) -> Self {
        Self::new(config.preferred_format, config.limit_data_usage)
    }

    pub fn compare(&self, a: &AudioStream, b: &AudioStream) -> Ordering {
        let preferred = match self.preferred_format {
            Some(format) => (a.format == Some(format)).cmp(&(b.format == Some(format))),
            None => Ordering::Equal,
        };

        let bitrate = if self.limit_data_usage {
            b.average_bitrate.cmp(&a.average_bitrate)
        } else {
            a.average_bitrate.cmp(&b.average_bitrate)
        };

        preferred
            .then(bitrate)
            .then_with(|| self.ranking.rank(a.format).cmp(&self.ranking.rank(b.format)))
    }
}

/// Orders tracks; the maximum is the track to play
#[derive(Debug, Clone)]
pub struct AudioTrackComparator {
    preferred_iso3: Option<&'static str>,
    prefer_original: bool,
    prefer_descriptive: bool,
}

impl AudioTrackComparator {
    pub fn new(preferred_language: &str, prefer_original: bool, prefer_descriptive: bool) -> Self {
        Self {
            preferred_iso3: locale::iso3_language(preferred_language),
            prefer_original,
            prefer_descriptive,
        }
    }

    pub fn from_config(config: &AudioSelectionConfig) -> Self {
        Self::new(
            &config.preferred_language,
            config.prefer_original_audio,
            config.prefer_descriptive_audio,
        )
    }

    // None (no locale) ranks below both Some(false) and Some(true)
    fn locale_is(stream: &AudioStream, iso3: Option<&str>) -> Option<bool> {
        stream
            .audio_locale
            .as_deref()
            .map(|tag| iso3.is_some() && locale::iso3_language(tag) == iso3)
    }

    pub fn compare(&self, a: &AudioStream, b: &AudioStream) -> Ordering {
        let original = if self.prefer_original {
            let is_original = |s: &AudioStream| s.audio_track_type == Some(AudioTrackType::Original);
            is_original(a).cmp(&is_original(b))
        } else {
            Ordering::Equal
        };

        original
            .then_with(|| {
                Self::locale_is(a, self.preferred_iso3).cmp(&Self::locale_is(b, self.preferred_iso3))
            })
            .then_with(|| {
                track_type_rank(a.audio_track_type, self.prefer_descriptive)
                    .cmp(&track_type_rank(b.audio_track_type, self.prefer_descriptive))
            })
            .then_with(|| Self::locale_is(a, Some(ENGLISH)).cmp(&Self::locale_is(b, Some(ENGLISH))))
    }
}

fn cmp_nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order in which tracks are listed to the user: by language name, then track type
pub fn compare_track_names(a: &AudioStream, b: &AudioStream) -> Ordering {
    let name = |s: &AudioStream| s.audio_locale.as_deref().map(locale::display_name);
    cmp_nulls_last(name(a), name(b)).then_with(|| cmp_nulls_last(a.audio_track_type, b.audio_track_type))
}

/// Index of the maximum under `cmp`; the first of several equal maxima wins
pub fn pick_by_highest_rank<T, F>(items: &[T], cmp: F) -> Option<usize>
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut best: Option<usize> = None;
    for (index, item) in items.iter().enumerate() {
        match best {
            Some(current) if cmp(item, &items[current]) != Ordering::Greater => {}
            _ => best = Some(index),
        }
    }
    best
}

// Track id -> streams, groups in order of first appearance
fn collect_by_track<'a, I>(streams: I) -> Vec<(String, Vec<AudioStream>)>
where
    I: IntoIterator<Item = &'a AudioStream>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<AudioStream>)> = Vec::new();
    for stream in streams {
        let key = stream.track_key();
        match positions.get(key) {
            Some(&i) => groups[i].1.push(stream.clone()),
            None => {
                positions.insert(key.to_string(), groups.len());
                groups.push((key.to_string(), vec![stream.clone()]));
            }
        }
    }
    if groups.len() > 1 {
        groups.retain(|(key, _)| !key.is_empty());
    }
    groups
}

/// Streams grouped by audio track
///
/// Streams without a track id only form a group when no other track exists. Each group
/// is sorted by [`AudioFormatComparator`] so its last stream is the preferred one, and
/// groups are listed by [`compare_track_names`] of the first stream given for them.
pub fn group_by_track(streams: &[AudioStream], config: &AudioSelectionConfig) -> Vec<Vec<AudioStream>> {
    let format_cmp = AudioFormatComparator::from_config(config);

    let mut groups: Vec<Vec<AudioStream>> = collect_by_track(streams)
        .into_iter()
        .map(|(_, group)| group)
        .collect();

    // ordered by the first stream as listed, before the per-group sort moves it
    groups.sort_by(|a, b| compare_track_names(&a[0], &b[0]));
    for group in &mut groups {
        group.sort_by(|a, b| format_cmp.compare(a, b));
    }
    groups
}

/// One stream per audio track, listed by track name
///
/// Torrent and HLS Opus streams are skipped. Within a track the best stream by track
/// then format ranking is kept.
pub fn select_best_per_track(streams: &[AudioStream], config: &AudioSelectionConfig) -> Vec<AudioStream> {
    let track_cmp = AudioTrackComparator::from_config(config);
    let format_cmp = AudioFormatComparator::from_config(config);

    let playable = streams.iter().filter(|s| {
        s.delivery_method != DeliveryMethod::Torrent
            && !(s.delivery_method == DeliveryMethod::Hls && s.format == Some(MediaFormat::Opus))
    });

    let mut best: Vec<AudioStream> = collect_by_track(playable)
        .into_iter()
        .filter_map(|(_, group)| {
            let index = pick_by_highest_rank(&group, |a, b| {
                track_cmp.compare(a, b).then_with(|| format_cmp.compare(a, b))
            })?;
            group.into_iter().nth(index)
        })
        .collect();

    best.sort_by(compare_track_names);
    best
}

/// Index of the stream to play by default, `None` for an empty list
pub fn default_audio_index(streams: &[AudioStream], config: &AudioSelectionConfig) -> Option<usize> {
    let track_cmp = AudioTrackComparator::from_config(config);
    let format_cmp = AudioFormatComparator::from_config(config);
    pick_by_highest_rank(streams, |a, b| {
        track_cmp.compare(a, b).then_with(|| format_cmp.compare(a, b))
    })
}

/// Index of the group whose track should be played by default
pub fn default_audio_track_group(groups: &[Vec<AudioStream>], config: &AudioSelectionConfig) -> Option<usize> {
    let track_cmp = AudioTrackComparator::from_config(config);
    pick_by_highest_rank(groups, |a, b| match (a.first(), b.first()) {
        (Some(a), Some(b)) => track_cmp.compare(a, b),
        (a, b) => a.is_some().cmp(&b.is_some()),
    })
}

/// Index of the first stream of `track_id`, or the default stream when there is none
pub fn audio_format_index(
    streams: &[AudioStream],
    track_id: Option<&str>,
    config: &AudioSelectionConfig,
) -> Option<usize> {
    track_id
        .and_then(|id| streams.iter().position(|s| s.audio_track_id.as_deref() == Some(id)))
        .or_else(|| default_audio_index(streams, config))
}

fn bitrate_then_rank(ranking: FormatRanking) -> impl Fn(&AudioStream, &AudioStream) -> Ordering {
    move |a, b| {
        a.average_bitrate
            .cmp(&b.average_bitrate)
            .then_with(|| ranking.rank(a.format).cmp(&ranking.rank(b.format)))
    }
}

// Best stream in `format`, or in any format if none matches
fn index_by_highest_rank_in_format<F>(format: Option<MediaFormat>, streams: &[AudioStream], cmp: F) -> Option<usize>
where
    F: Fn(&AudioStream, &AudioStream) -> Ordering,
{
    let candidates: Vec<usize> = (0..streams.len())
        .filter(|&i| format.is_none() || streams[i].format == format)
        .collect();

    if candidates.is_empty() {
        return if format.is_some() {
            pick_by_highest_rank(streams, cmp)
        } else {
            None
        };
    }

    pick_by_highest_rank(&candidates, |&a, &b| cmp(&streams[a], &streams[b])).map(|i| candidates[i])
}

/// Highest bitrate, then best container; restricted to `format` when it has any stream
pub fn highest_quality_audio_index(format: Option<MediaFormat>, streams: &[AudioStream]) -> Option<usize> {
    index_by_highest_rank_in_format(format, streams, bitrate_then_rank(FormatRanking::AUDIO_QUALITY))
}

/// Lowest bitrate, then most efficient container; restricted to `format` when it has any
/// stream
pub fn most_compact_audio_index(format: Option<MediaFormat>, streams: &[AudioStream]) -> Option<usize> {
    let cmp = bitrate_then_rank(FormatRanking::AUDIO_EFFICIENCY);
    index_by_highest_rank_in_format(format, streams, move |a, b| cmp(b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(id: &str, format: MediaFormat, bitrate: i32) -> AudioStream {
        AudioStream::new(id, Some(format), bitrate)
    }

    fn track(id: &str, track_id: Option<&str>, locale: Option<&str>, track_type: Option<AudioTrackType>) -> AudioStream {
        let mut stream = AudioStream::new(id, Some(MediaFormat::M4a), 128);
        stream.audio_track_id = track_id.map(str::to_string);
        stream.audio_locale = locale.map(str::to_string);
        stream.audio_track_type = track_type;
        stream
    }

    fn audio_list() -> Vec<AudioStream> {
        vec![
            audio("m4a-128-1", MediaFormat::M4a, 128),
            audio("webma-192", MediaFormat::Webma, 192),
            audio("mp3-64", MediaFormat::Mp3, 64),
            audio("webma-192", MediaFormat::Webma, 192),
            audio("m4a-128-2", MediaFormat::M4a, 128),
            audio("mp3-128", MediaFormat::Mp3, 128),
            audio("webma-64", MediaFormat::Webma, 64),
            audio("m4a-320", MediaFormat::M4a, 320),
            audio("mp3-192", MediaFormat::Mp3, 192),
            audio("webma-320", MediaFormat::Webma, 320),
        ]
    }

    fn track_list() -> Vec<AudioStream> {
        vec![
            track("en.or", Some("en.or"), Some("en"), Some(AudioTrackType::Original)),
            track("en.du", Some("en.du"), Some("en"), Some(AudioTrackType::Dubbed)),
            track("en.ds", Some("en.ds"), Some("en"), Some(AudioTrackType::Descriptive)),
            track("unknown", None, None, None),
            track("de.du", Some("de.du"), Some("de"), Some(AudioTrackType::Dubbed)),
            track("de.ds", Some("de.ds"), Some("de"), Some(AudioTrackType::Descriptive)),
        ]
    }

    fn best_by_format(streams: &[AudioStream], format: Option<MediaFormat>, limit: bool) -> &AudioStream {
        let cmp = AudioFormatComparator::new(format, limit);
        &streams[pick_by_highest_rank(streams, |a, b| cmp.compare(a, b)).unwrap()]
    }

    fn best_track<'a>(streams: &'a [AudioStream], language: &str, original: bool, descriptive: bool) -> &'a str {
        let cmp = AudioTrackComparator::new(language, original, descriptive);
        &streams[pick_by_highest_rank(streams, |a, b| cmp.compare(a, b)).unwrap()].content
    }

    #[test]
    fn test_highest_quality_per_preferred_format() {
        let streams = audio_list();
        let best = best_by_format(&streams, Some(MediaFormat::M4a), false);
        assert_eq!((best.average_bitrate, best.format), (320, Some(MediaFormat::M4a)));

        let best = best_by_format(&streams, Some(MediaFormat::Webma), false);
        assert_eq!((best.average_bitrate, best.format), (320, Some(MediaFormat::Webma)));

        let best = best_by_format(&streams, None, false);
        assert_eq!((best.average_bitrate, best.format), (320, Some(MediaFormat::M4a)));
    }

    #[test]
    fn test_lowest_quality_when_limiting_data() {
        let streams = audio_list();
        let best = best_by_format(&streams, Some(MediaFormat::M4a), true);
        assert_eq!((best.average_bitrate, best.format), (128, Some(MediaFormat::M4a)));
        assert_eq!(best.content, "m4a-128-1");

        let best = best_by_format(&streams, Some(MediaFormat::Webma), true);
        assert_eq!((best.average_bitrate, best.format), (64, Some(MediaFormat::Webma)));
    }

    #[test]
    fn test_compact_prefers_efficient_container() {
        let streams = vec![
            audio("webma-192-1", MediaFormat::Webma, 192),
            audio("m4a-192-1", MediaFormat::M4a, 192),
            audio("webma-256", MediaFormat::Webma, 256),
            audio("m4a-192-2", MediaFormat::M4a, 192),
        ];
        let best = best_by_format(&streams, Some(MediaFormat::Mp3), true);
        assert_eq!(best.content, "webma-192-1");
    }

    #[test]
    fn test_pick_by_highest_rank_empty_and_ties() {
        let empty: Vec<AudioStream> = Vec::new();
        assert_eq!(pick_by_highest_rank(&empty, |a: &AudioStream, b| a.average_bitrate.cmp(&b.average_bitrate)), None);
        assert_eq!(pick_by_highest_rank(&[3, 7, 7, 1], |a, b| a.cmp(b)), Some(1));
    }

    #[test]
    fn test_track_selection() {
        let tracks = track_list();
        assert_eq!(best_track(&tracks, "en", false, false), "en.or");
        assert_eq!(best_track(&tracks, "de", false, false), "de.du");
        assert_eq!(best_track(&tracks, "de", true, false), "en.or");
        assert_eq!(best_track(&tracks, "en", false, true), "en.ds");
        assert_eq!(best_track(&tracks, "ja", true, false), "en.or");
    }

    #[test]
    fn test_missing_locale_ranks_lowest() {
        let tracks = vec![
            track("unknown", Some("x"), None, Some(AudioTrackType::Original)),
            track("fr", Some("fr"), Some("fr"), Some(AudioTrackType::Dubbed)),
        ];
        assert_eq!(best_track(&tracks, "fr", false, false), "fr");
    }

    #[test]
    fn test_group_by_track_drops_unknown_group() {
        let config = AudioSelectionConfig::default();
        let groups = group_by_track(&track_list(), &config);
        let ids: Vec<&str> = groups.iter().map(|g| g[0].content.as_str()).collect();
        assert_eq!(ids, ["en.or", "en.du", "en.ds", "de.du", "de.ds"]);
    }

    #[test]
    fn test_group_by_track_keeps_only_unknown_group() {
        let config = AudioSelectionConfig::default();
        let groups = group_by_track(&audio_list(), &config);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 10);
    }

    #[test]
    fn test_group_sorted_with_preferred_last() {
        let config = AudioSelectionConfig {
            preferred_format: Some(MediaFormat::Webma),
            ..Default::default()
        };
        let streams = vec![
            audio("webma-64", MediaFormat::Webma, 64),
            audio("m4a-320", MediaFormat::M4a, 320),
            audio("webma-160", MediaFormat::Webma, 160),
        ];
        let groups = group_by_track(&streams, &config);
        let ids: Vec<&str> = groups[0].iter().map(|s| s.content.as_str()).collect();
        assert_eq!(ids, ["m4a-320", "webma-64", "webma-160"]);
    }

    #[test]
    fn test_groups_ordered_by_first_listed_stream() {
        let config = AudioSelectionConfig {
            preferred_format: Some(MediaFormat::Webma),
            ..Default::default()
        };
        let mut first = track("mixed-de", Some("mixed"), Some("de"), Some(AudioTrackType::Original));
        first.format = Some(MediaFormat::Webma);
        let streams = vec![
            first,
            track("mixed-fr", Some("mixed"), Some("fr"), Some(AudioTrackType::Original)),
            track("en", Some("en"), Some("en"), Some(AudioTrackType::Original)),
        ];

        let groups = group_by_track(&streams, &config);
        // "German" < "English" even though the format sort moves the French stream first
        assert_eq!(groups[0][0].content, "mixed-fr");
        assert_eq!(groups[0][1].content, "mixed-de");
        assert_eq!(groups[1][0].content, "en");
    }

    #[test]
    fn test_select_best_per_track() {
        let config = AudioSelectionConfig {
            preferred_format: Some(MediaFormat::M4a),
            ..Default::default()
        };
        let mut streams = track_list();
        streams.push(
            track("en.or-webma", Some("en.or"), Some("en"), Some(AudioTrackType::Original))
                .with_delivery(DeliveryMethod::Dash),
        );
        streams[6].format = Some(MediaFormat::Webma);
        streams.push({
            let mut s = track("de.du-torrent", Some("de.du"), Some("de"), Some(AudioTrackType::Dubbed));
            s.average_bitrate = 320;
            s.delivery_method = DeliveryMethod::Torrent;
            s
        });

        let best = select_best_per_track(&streams, &config);
        let ids: Vec<&str> = best.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(ids, ["en.or", "en.du", "en.ds", "de.du", "de.ds"]);
    }

    #[test]
    fn test_select_best_skips_hls_opus() {
        let config = AudioSelectionConfig::default();
        let streams = vec![
            audio("opus", MediaFormat::Opus, 160).with_delivery(DeliveryMethod::Hls),
            audio("m4a", MediaFormat::M4a, 128).with_delivery(DeliveryMethod::Hls),
        ];
        let best = select_best_per_track(&streams, &config);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].content, "m4a");
    }

    #[test]
    fn test_default_audio_track_group() {
        let config = AudioSelectionConfig {
            preferred_language: "de".to_string(),
            ..Default::default()
        };
        let groups = group_by_track(&track_list(), &config);
        let index = default_audio_track_group(&groups, &config).unwrap();
        assert_eq!(groups[index][0].content, "de.du");
        assert_eq!(default_audio_track_group(&[], &config), None);
    }

    #[test]
    fn test_audio_format_index() {
        let config = AudioSelectionConfig::default();
        let tracks = track_list();
        assert_eq!(audio_format_index(&tracks, Some("de.ds"), &config), Some(5));
        assert_eq!(audio_format_index(&tracks, Some("missing"), &config), Some(0));
        assert_eq!(audio_format_index(&tracks, None, &config), Some(0));
        assert_eq!(audio_format_index(&[], None, &config), None);
    }

    #[test]
    fn test_highest_quality_and_most_compact() {
        let streams = audio_list();
        let index = highest_quality_audio_index(Some(MediaFormat::Mp3), &streams).unwrap();
        assert_eq!(streams[index].content, "mp3-192");
        let index = highest_quality_audio_index(None, &streams).unwrap();
        assert_eq!(streams[index].content, "m4a-320");

        let index = most_compact_audio_index(Some(MediaFormat::M4a), &streams).unwrap();
        assert_eq!(streams[index].content, "m4a-128-1");
        let index = most_compact_audio_index(None, &streams).unwrap();
        assert_eq!(streams[index].content, "mp3-64");

        let index = most_compact_audio_index(Some(MediaFormat::Flac), &streams).unwrap();
        assert_eq!(streams[index].content, "mp3-64");
        assert_eq!(highest_quality_audio_index(None, &[]), None);
    }

    #[test]
    fn test_track_name_order() {
        let mut tracks = track_list();
        tracks.sort_by(compare_track_names);
        let ids: Vec<&str> = tracks.iter().map(|s| s.content.as_str()).collect();
        assert_eq!(ids, ["en.or", "en.du", "en.ds", "de.du", "de.ds", "unknown"]);
    }
}
