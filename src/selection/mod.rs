//! Stream selection: ordering, ranking and picking the defaults
//!
//! Everything in here is synchronous and free of I/O. Functions taking `&mut` lists sort
//! them in place, which invalidates any index computed before the call.

pub mod audio;
pub mod pairing;
pub mod ranking;
pub mod resolution;
pub mod resolver;
pub mod sort;

pub use audio::{
    default_audio_index, default_audio_track_group, group_by_track, select_best_per_track,
    AudioFormatComparator, AudioSelectionConfig, AudioTrackComparator,
};
pub use pairing::{pair_video_only_streams, SecondaryStreamBinding, SecondaryStreams};
pub use resolution::compare_resolutions;
pub use resolver::{default_resolution_index, effective_resolution, video_stream_index};
pub use sort::{playable_streams, sort_streams, sorted_video_streams};
