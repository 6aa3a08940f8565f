//! User preferences consumed by the selection engine

use crate::extractor::format::MediaFormat;
use crate::extractor::models::VideoStream;
use crate::selection::audio::AudioSelectionConfig;
use crate::utils::locale;
use crate::selection::resolver::{default_resolution_index, effective_resolution};
use crate::utils::error::StreamError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Resolution preference meaning "whatever is the best available"
pub const BEST_RESOLUTION: &str = "best";

/// Preferences, as stored by the settings layer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Resolution label for the main player, or "best"
    pub default_resolution: String,

    /// Resolution label for the popup player, or "best"
    pub default_popup_resolution: String,

    /// Preferred video container key ("mp4", "webm", "3gp")
    pub default_video_format: String,

    /// Preferred audio container key ("m4a", "webma")
    pub default_audio_format: String,

    /// Language tag used to rank audio tracks
    pub preferred_language: String,

    /// Pick the original track regardless of its language
    pub prefer_original_audio: bool,

    /// Rank descriptive tracks above dubbed and original ones
    pub prefer_descriptive_audio: bool,

    /// Keep 1440p and 2160p streams in sorted lists
    pub show_higher_resolutions: bool,

    /// Prefer video-only streams over muxed ones of the same resolution
    pub prefer_video_only_streams: bool,

    /// Highest resolution allowed on metered networks, None for no limit
    pub mobile_data_limit: Option<String>,

    /// Whether the active network is metered (supplied by the platform)
    pub network_metered: bool,

    /// Timeout for each HEAD probe, in seconds
    pub probe_timeout_secs: u64,

    /// Maximum number of HEAD probes in flight
    pub probe_concurrency: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_resolution: BEST_RESOLUTION.to_string(),
            default_popup_resolution: "480p".to_string(),
            default_video_format: "mp4".to_string(),
            default_audio_format: "m4a".to_string(),
            preferred_language: "en".to_string(),
            prefer_original_audio: false,
            prefer_descriptive_audio: false,
            show_higher_resolutions: false,
            prefer_video_only_streams: false,
            mobile_data_limit: None,
            network_metered: false,
            probe_timeout_secs: 10,
            probe_concurrency: 4,
        }
    }
}

impl Preferences {
    /// Load preferences from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StreamError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let prefs: Preferences = toml::from_str(&content)?;
        prefs.validate()?;
        Ok(prefs)
    }

    /// Load from the default location, falling back to defaults if no file exists
    pub fn load_or_default() -> Result<Self, StreamError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => {
                debug!("No preferences file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/streampicker/preferences.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("streampicker").join("preferences.toml"))
    }

    /// Reject values the engine cannot interpret
    pub fn validate(&self) -> Result<(), StreamError> {
        if MediaFormat::from_preference_key(&self.default_video_format).is_none() {
            return Err(StreamError::InvalidPreference {
                key: "default_video_format",
                value: self.default_video_format.clone(),
            });
        }
        if MediaFormat::from_preference_key(&self.default_audio_format).is_none() {
            return Err(StreamError::InvalidPreference {
                key: "default_audio_format",
                value: self.default_audio_format.clone(),
            });
        }
        if locale::iso3_language(&self.preferred_language).is_none() {
            return Err(StreamError::InvalidPreference {
                key: "preferred_language",
                value: self.preferred_language.clone(),
            });
        }
        if self.probe_concurrency == 0 {
            return Err(StreamError::InvalidPreference {
                key: "probe_concurrency",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn video_format(&self) -> Option<MediaFormat> {
        MediaFormat::from_preference_key(&self.default_video_format)
    }

    pub fn audio_format(&self) -> Option<MediaFormat> {
        MediaFormat::from_preference_key(&self.default_audio_format)
    }

    /// The resolution cap currently in force, if any
    pub fn resolution_limit(&self) -> Option<&str> {
        if self.network_metered {
            self.mobile_data_limit.as_deref()
        } else {
            None
        }
    }

    /// Data saving is active when on a metered network with a cap configured
    pub fn limit_data_usage(&self) -> bool {
        self.resolution_limit().is_some()
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Everything the audio ranking needs, resolved once
    pub fn audio_selection(&self) -> AudioSelectionConfig {
        AudioSelectionConfig {
            preferred_language: self.preferred_language.clone(),
            prefer_original_audio: self.prefer_original_audio,
            prefer_descriptive_audio: self.prefer_descriptive_audio,
            preferred_format: self.audio_format(),
            limit_data_usage: self.limit_data_usage(),
        }
    }

    /// Index of the default stream for the main player; sorts `streams` descending
    pub fn resolution_index(&self, streams: &mut [VideoStream]) -> Option<usize> {
        self.index_for(&self.default_resolution, streams)
    }

    /// Index of the default stream for the popup player; sorts `streams` descending
    pub fn popup_resolution_index(&self, streams: &mut [VideoStream]) -> Option<usize> {
        self.index_for(&self.default_popup_resolution, streams)
    }

    fn index_for(&self, preferred: &str, streams: &mut [VideoStream]) -> Option<usize> {
        let resolution = effective_resolution(preferred, BEST_RESOLUTION, self.resolution_limit());
        default_resolution_index(&resolution, BEST_RESOLUTION, self.video_format(), streams)
    }
}
