//! Per-stream size and format storage filled in by HEAD probes

use crate::extractor::format::MediaFormat;
use crate::extractor::models::Stream;
use crate::metadata::probe::{resolve_format, HeadProbe, ProbeHeaders};
use crate::utils::error::StreamError;
use crate::utils::format::{format_bytes, UNKNOWN_SIZE};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Size of a stream in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamSize {
    /// Not probed yet
    #[default]
    Unset,
    /// Probe failed
    Unknown,
    Known(u64),
}

impl StreamSize {
    /// Legacy encoding: -2 unset, -1 unknown, otherwise the byte count
    pub fn as_i64(self) -> i64 {
        match self {
            StreamSize::Unset => -2,
            StreamSize::Unknown => -1,
            StreamSize::Known(bytes) => bytes.min(i64::MAX as u64) as i64,
        }
    }

    pub fn bytes(self) -> Option<u64> {
        match self {
            StreamSize::Known(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn is_unset(self) -> bool {
        self == StreamSize::Unset
    }
}

impl fmt::Display for StreamSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamSize::Known(bytes) => f.write_str(&format_bytes(*bytes)),
            _ => f.write_str(UNKNOWN_SIZE),
        }
    }
}

/// Position of a stream inside one [`StreamMetadataWrapper`]
///
/// Handles are only meaningful for the wrapper that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamHandle(usize);

impl StreamHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct StreamRecord<S> {
    stream: S,
    size: Cell<StreamSize>,
    format: Cell<Option<MediaFormat>>,
}

/// What a pending probe has to fill in
#[derive(Debug)]
struct ProbeJob {
    handle: StreamHandle,
    url: String,
    need_size: bool,
    need_format: bool,
}

/// A stream list plus the size and format learned about each stream
///
/// Sizes start out unset and formats start out as reported by the extractor. The cells
/// can be updated through a shared reference, so the wrapper is `Send` but not `Sync`.
#[derive(Debug)]
pub struct StreamMetadataWrapper<S> {
    records: Vec<StreamRecord<S>>,
}

impl<S: Stream> StreamMetadataWrapper<S> {
    pub fn new(streams: Vec<S>) -> Self {
        let records = streams
            .into_iter()
            .map(|stream| StreamRecord {
                size: Cell::new(StreamSize::Unset),
                format: Cell::new(stream.format()),
                stream,
            })
            .collect();
        Self { records }
    }

    pub fn empty() -> Self {
        Self { records: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = StreamHandle> {
        (0..self.records.len()).map(StreamHandle)
    }

    pub fn handle_at(&self, position: usize) -> Option<StreamHandle> {
        (position < self.records.len()).then_some(StreamHandle(position))
    }

    /// Handle of the first stream equal to `stream`
    pub fn handle_of(&self, stream: &S) -> Option<StreamHandle>
    where
        S: PartialEq,
    {
        self.records
            .iter()
            .position(|r| r.stream == *stream)
            .map(StreamHandle)
    }

    pub fn stream(&self, handle: StreamHandle) -> &S {
        &self.records[handle.0].stream
    }

    pub fn streams(&self) -> impl Iterator<Item = &S> {
        self.records.iter().map(|r| &r.stream)
    }

    pub fn size(&self, handle: StreamHandle) -> StreamSize {
        self.records[handle.0].size.get()
    }

    pub fn set_size(&self, handle: StreamHandle, size: StreamSize) {
        self.records[handle.0].size.set(size);
    }

    /// Size in the legacy encoding, see [`StreamSize::as_i64`]
    pub fn size_in_bytes(&self, handle: StreamHandle) -> i64 {
        self.size(handle).as_i64()
    }

    pub fn formatted_size(&self, handle: StreamHandle) -> String {
        self.size(handle).to_string()
    }

    pub fn format(&self, handle: StreamHandle) -> Option<MediaFormat> {
        self.records[handle.0].format.get()
    }

    pub fn set_format(&self, handle: StreamHandle, format: Option<MediaFormat>) {
        self.records[handle.0].format.set(format);
    }

    /// Forget every probed size and go back to the extractor's formats
    pub fn reset_info(&self) {
        for record in &self.records {
            record.size.set(StreamSize::Unset);
            record.format.set(record.stream.format());
        }
    }

    fn job_for(&self, handle: StreamHandle) -> Option<ProbeJob> {
        let need_size = self.size(handle).is_unset();
        let need_format = self.format(handle).is_none();
        if !need_size && !need_format {
            return None;
        }
        Some(ProbeJob {
            handle,
            url: self.stream(handle).content().to_string(),
            need_size,
            need_format,
        })
    }

    fn apply(&self, job: &ProbeJob, result: Result<ProbeHeaders, StreamError>) -> bool {
        let headers = match result {
            Ok(headers) => headers,
            Err(e) => {
                warn!("Probing {} failed: {}", job.url, e);
                if job.need_size {
                    self.set_size(job.handle, StreamSize::Unknown);
                }
                return true;
            }
        };

        let mut changed = false;
        if job.need_size {
            if let Some(length) = headers.content_length() {
                self.set_size(job.handle, StreamSize::Known(length));
                changed = true;
            }
        }
        if job.need_format {
            if let Some(format) = resolve_format(&headers) {
                debug!("Resolved {} as {}", job.url, format.name());
                self.set_format(job.handle, Some(format));
                changed = true;
            }
        }
        changed
    }

    /// Probe one stream if its size or format is still missing
    ///
    /// Returns whether anything was updated. A failed request marks the size unknown and
    /// counts as an update.
    pub async fn ensure_size_and_format<P>(&self, handle: StreamHandle, probe: &P) -> bool
    where
        P: HeadProbe + ?Sized,
    {
        let Some(job) = self.job_for(handle) else {
            return false;
        };
        let result = probe.head(&job.url).await;
        self.apply(&job, result)
    }

    /// Probe every stream that is missing data, at most `concurrency` at a time
    ///
    /// Results are only written once all probes have finished; dropping the future
    /// leaves the wrapper untouched.
    pub async fn refresh_all<P>(&mut self, probe: &P, concurrency: usize) -> bool
    where
        P: HeadProbe + ?Sized,
    {
        let jobs: Vec<ProbeJob> = self.handles().filter_map(|h| self.job_for(h)).collect();
        if jobs.is_empty() {
            return false;
        }
        debug!("Probing {} of {} streams", jobs.len(), self.len());

        let results: Vec<(ProbeJob, Result<ProbeHeaders, StreamError>)> = stream::iter(jobs)
            .map(|job| async move {
                let result = probe.head(&job.url).await;
                (job, result)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut changed = false;
        for (job, result) in results {
            changed |= self.apply(&job, result);
        }
        changed
    }
}

/// Refresh `wrapper` on the runtime and hand it back with the change flag
pub fn spawn_refresh<S>(
    mut wrapper: StreamMetadataWrapper<S>,
    probe: Arc<dyn HeadProbe>,
    concurrency: usize,
) -> JoinHandle<(StreamMetadataWrapper<S>, bool)>
where
    S: Stream + Send + 'static,
{
    tokio::spawn(async move {
        let changed = wrapper.refresh_all(probe.as_ref(), concurrency).await;
        (wrapper, changed)
    })
}
