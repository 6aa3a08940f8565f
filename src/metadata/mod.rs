//! Stream sizes and formats learned from HEAD requests

pub mod http;
pub mod probe;
pub mod wrapper;

pub use http::HttpHeadProbe;
pub use probe::{resolve_format, HeadProbe, ProbeHeaders};
pub use wrapper::{spawn_refresh, StreamHandle, StreamMetadataWrapper, StreamSize};
