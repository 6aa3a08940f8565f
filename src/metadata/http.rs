//! HEAD probe over HTTP

use crate::metadata::probe::{HeadProbe, ProbeHeaders};
use crate::utils::config::Preferences;
use crate::utils::error::StreamError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Sends HEAD requests with `reqwest`, giving up after `timeout`
#[derive(Debug, Clone)]
pub struct HttpHeadProbe {
    client: Client,
    timeout: Duration,
}

impl HttpHeadProbe {
    pub fn new(timeout: Duration) -> Result<Self, StreamError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, timeout })
    }

    /// Use a preconfigured client, e.g. one with custom proxy settings
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn from_preferences(prefs: &Preferences) -> Result<Self, StreamError> {
        Self::new(prefs.probe_timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HeadProbe for HttpHeadProbe {
    async fn head(&self, url: &str) -> Result<ProbeHeaders, StreamError> {
        // wrap HEAD in a timeout to avoid blocking indefinitely
        match tokio::time::timeout(self.timeout, self.client.head(url).send()).await {
            Ok(Ok(response)) => {
                debug!("HEAD {} -> {}", url, response.status());
                Ok(ProbeHeaders::from_header_map(response.headers()))
            }
            Ok(Err(e)) => {
                warn!("HEAD request to {} failed: {}", url, e);
                Err(e.into())
            }
            Err(_) => {
                warn!("HEAD request to {} timed out after {:?}", url, self.timeout);
                Err(StreamError::ProbeTimeout(url.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};

    #[test]
    fn test_from_header_map() {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_LENGTH, HeaderValue::from_static("4096"));
        map.insert(CONTENT_TYPE, HeaderValue::from_static("audio/webm"));
        map.insert("x-amz-meta-file-type", HeaderValue::from_static("opus"));

        let headers = ProbeHeaders::from_header_map(&map);
        assert_eq!(headers.content_length(), Some(4096));
        assert_eq!(headers.get("Content-Type"), Some("audio/webm"));
        assert_eq!(headers.get("x-amz-meta-file-type"), Some("opus"));
    }

    #[test]
    fn test_probe_from_preferences() {
        let prefs = Preferences {
            probe_timeout_secs: 3,
            ..Default::default()
        };
        let probe = HttpHeadProbe::from_preferences(&prefs).unwrap();
        assert_eq!(probe.timeout(), Duration::from_secs(3));
    }
}
