//! Streampicker - pick the default streams for a video
//!
//! Reads the streams an extractor found for one item from a JSON file, applies the
//! user's preferences and prints the sorted lists together with the streams that would
//! be played by default.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use streampicker::extractor::{AudioStream, JsonStreamSource, StreamSource, VideoStream};
use streampicker::metadata::{HttpHeadProbe, StreamMetadataWrapper};
use streampicker::selection::{self, SecondaryStreams};
use streampicker::utils::Preferences;
use tracing::info;

#[derive(Parser)]
#[command(name = "streampicker", version, about)]
struct Args {
    /// JSON file with the extracted streams
    streams: PathBuf,

    /// Preferences file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preferred resolution, e.g. "720p" or "best"
    #[arg(short, long)]
    resolution: Option<String>,

    /// Use the popup player resolution instead of the main one
    #[arg(long)]
    popup: bool,

    /// Preferred video container ("mp4", "webm", "3gp")
    #[arg(long)]
    video_format: Option<String>,

    /// Preferred audio container ("m4a", "webma")
    #[arg(long)]
    audio_format: Option<String>,

    /// Preferred audio language tag
    #[arg(short, long)]
    language: Option<String>,

    /// Treat the network as metered
    #[arg(long)]
    metered: bool,

    /// Highest resolution allowed on metered networks
    #[arg(long)]
    data_limit: Option<String>,

    /// Keep 1440p and 2160p streams
    #[arg(long)]
    show_higher: bool,

    /// Send HEAD requests to learn sizes and missing formats
    #[arg(long)]
    probe: bool,
}

#[derive(Serialize)]
struct VideoEntry {
    resolution: String,
    format: String,
    video_only: bool,
    size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    combined_size: Option<String>,
    url: String,
}

#[derive(Serialize)]
struct AudioEntry {
    track: String,
    language: Option<String>,
    format: String,
    quality: String,
    size: String,
    url: String,
}

#[derive(Serialize)]
struct Report {
    default_video: Option<usize>,
    default_audio: Option<usize>,
    default_track: Option<usize>,
    video_only_without_audio: bool,
    video: Vec<VideoEntry>,
    audio: Vec<AudioEntry>,
    tracks: Vec<AudioEntry>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streampicker=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let prefs = load_preferences(&args)?;

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(run(&args, &prefs))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_preferences(args: &Args) -> Result<Preferences> {
    let mut prefs = match &args.config {
        Some(path) => Preferences::from_file(path)?,
        None => Preferences::load_or_default()?,
    };

    if let Some(resolution) = &args.resolution {
        if args.popup {
            prefs.default_popup_resolution = resolution.clone();
        } else {
            prefs.default_resolution = resolution.clone();
        }
    }
    if let Some(format) = &args.video_format {
        prefs.default_video_format = format.clone();
    }
    if let Some(format) = &args.audio_format {
        prefs.default_audio_format = format.clone();
    }
    if let Some(language) = &args.language {
        prefs.preferred_language = language.clone();
    }
    if let Some(limit) = &args.data_limit {
        prefs.mobile_data_limit = Some(limit.clone());
    }
    prefs.network_metered |= args.metered;
    prefs.show_higher_resolutions |= args.show_higher;

    prefs.validate()?;
    Ok(prefs)
}

async fn run(args: &Args, prefs: &Preferences) -> Result<Report> {
    let source = JsonStreamSource::new(&args.streams);
    let extracted = source.extract_streams(&args.streams.to_string_lossy()).await?;
    let service = extracted.service.as_deref();

    let video = selection::playable_streams(&extracted.video_streams, service);
    let video_only = selection::playable_streams(&extracted.video_only_streams, service);
    let audio = selection::playable_streams(&extracted.audio_streams, service);

    let mut sorted = selection::sorted_video_streams(
        prefs.video_format(),
        prefs.show_higher_resolutions,
        &video,
        &video_only,
        false,
        prefs.prefer_video_only_streams,
    );
    let default_video = if args.popup {
        prefs.popup_resolution_index(&mut sorted)
    } else {
        prefs.resolution_index(&mut sorted)
    };

    let audio_config = prefs.audio_selection();
    let tracks = selection::select_best_per_track(&audio, &audio_config);
    let default_track = selection::default_audio_index(&tracks, &audio_config);
    let default_audio = selection::default_audio_index(&audio, &audio_config);

    let mut video_wrapper = StreamMetadataWrapper::new(sorted);
    let mut audio_wrapper = StreamMetadataWrapper::new(audio);

    if args.probe {
        let probe = HttpHeadProbe::from_preferences(prefs)?;
        let video_changed = video_wrapper.refresh_all(&probe, prefs.probe_concurrency).await;
        let audio_changed = audio_wrapper.refresh_all(&probe, prefs.probe_concurrency).await;
        info!("Probe finished (video changed: {}, audio changed: {})", video_changed, audio_changed);
    }

    let secondary = selection::pair_video_only_streams(&video_wrapper, &audio_wrapper, &audio_config);
    let tracks_wrapper = StreamMetadataWrapper::new(tracks);

    Ok(Report {
        default_video,
        default_audio,
        default_track,
        video_only_without_audio: secondary.has_unpaired_video_only(&video_wrapper),
        video: video_entries(&video_wrapper, &audio_wrapper, &secondary),
        audio: audio_entries(&audio_wrapper),
        tracks: audio_entries(&tracks_wrapper),
    })
}

fn video_entries(
    video: &StreamMetadataWrapper<VideoStream>,
    audio: &StreamMetadataWrapper<AudioStream>,
    secondary: &SecondaryStreams,
) -> Vec<VideoEntry> {
    video
        .handles()
        .map(|handle| {
            let stream = video.stream(handle);
            let position = handle.index();
            VideoEntry {
                resolution: stream.resolution.clone(),
                format: format_label(video.format(handle)),
                video_only: stream.is_video_only,
                size: video.formatted_size(handle),
                audio: secondary.get(position).map(|b| b.stream().content.clone()),
                combined_size: secondary
                    .combined_size(video, audio, position)
                    .map(streampicker::utils::format_bytes),
                url: stream.content.clone(),
            }
        })
        .collect()
}

fn audio_entries(audio: &StreamMetadataWrapper<AudioStream>) -> Vec<AudioEntry> {
    audio
        .handles()
        .map(|handle| {
            let stream = audio.stream(handle);
            AudioEntry {
                track: stream.track_key().to_string(),
                language: stream
                    .audio_locale
                    .as_deref()
                    .map(streampicker::utils::locale::display_name),
                format: format_label(audio.format(handle)),
                quality: stream.quality_label(),
                size: audio.formatted_size(handle),
                url: stream.content.clone(),
            }
        })
        .collect()
}

fn format_label(format: Option<streampicker::MediaFormat>) -> String {
    format.map_or_else(|| "unknown".to_string(), |f| f.display_label().to_string())
}
