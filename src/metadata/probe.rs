//! HEAD probing and resolution of a media format from response headers

use crate::extractor::format::MediaFormat;
use crate::utils::error::StreamError;
use async_trait::async_trait;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Response headers of a HEAD request, names matched case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeHeaders {
    headers: BTreeMap<String, String>,
}

impl ProbeHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, later values replace earlier ones
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Lowercased names and values, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn from_header_map(map: &reqwest::header::HeaderMap) -> Self {
        let mut headers = Self::new();
        for (name, value) in map {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str(), value);
            }
        }
        headers
    }

    /// `Content-Length` when present, non-empty and numeric
    pub fn content_length(&self) -> Option<u64> {
        self.get("content-length")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse().ok())
    }
}

/// Anything able to send a HEAD request
#[async_trait]
pub trait HeadProbe: Send + Sync {
    async fn head(&self, url: &str) -> Result<ProbeHeaders, StreamError>;
}

type FormatResolver = fn(&ProbeHeaders) -> Option<MediaFormat>;

/// Header based resolvers, tried in order
pub const FORMAT_RESOLVERS: [FormatResolver; 3] = [
    format_from_file_type_headers,
    format_from_content_disposition,
    format_from_content_type,
];

/// First format any resolver can find
pub fn resolve_format(headers: &ProbeHeaders) -> Option<MediaFormat> {
    FORMAT_RESOLVERS.iter().find_map(|resolve| resolve(headers))
}

/// CDN specific headers such as `x-amz-meta-file-type: mp3`
pub fn format_from_file_type_headers(headers: &ProbeHeaders) -> Option<MediaFormat> {
    headers
        .iter()
        .filter(|(name, _)| name.ends_with("file-type"))
        .find_map(|(_, value)| MediaFormat::from_suffix(value.trim()))
}

// Percent-decoding that rejects a `%` not followed by two hex digits
fn url_decode(value: &str) -> Option<Cow<'_, str>> {
    let bytes = value.as_bytes();
    let malformed = bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    });
    if malformed {
        return None;
    }
    urlencoding::decode(value).ok()
}

/// Suffix of the file name in `Content-Disposition`
///
/// Handles both `filename=` and `filename*=` directives, quoted or not.
pub fn format_from_content_disposition(headers: &ProbeHeaders) -> Option<MediaFormat> {
    let header = headers.get("content-disposition")?;
    let decoded = url_decode(header)?;

    for part in decoded.split(';') {
        let part = part.trim();
        let file_name = if let Some(name) = part.strip_prefix("filename=") {
            name
        } else if let Some(name) = part.strip_prefix("filename*=") {
            name
        } else {
            continue;
        };

        let Some(file_name) = url_decode(file_name) else {
            continue;
        };
        let suffix = file_name
            .trim_end_matches('.')
            .rsplit('.')
            .next()
            .unwrap_or_default();
        let suffix = suffix
            .strip_suffix('"')
            .or_else(|| suffix.strip_suffix('\''))
            .unwrap_or(suffix);

        if let Some(format) = MediaFormat::from_suffix(suffix) {
            return Some(format);
        }
    }
    None
}

/// Format registered for the `Content-Type` MIME type, unless it is shared by formats
/// with different ids
pub fn format_from_content_type(headers: &ProbeHeaders) -> Option<MediaFormat> {
    let content_type = headers.get("content-type")?;
    let mime = content_type.split(';').next().unwrap_or_default().trim();

    let mut found: Option<MediaFormat> = None;
    for format in MediaFormat::all_from_mime_type(mime) {
        match found {
            None => found = Some(format),
            Some(first) if first.id() != format.id() => return None,
            Some(_) => {}
        }
    }
    found
}
