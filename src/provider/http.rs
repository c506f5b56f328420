//! HTTP-backed stream provider.
//!
//! Resolves video metadata from a JSON resolver endpoint and opens
//! progressive-HTTP byte streams for formats that carry a direct media URL.

use async_trait::async_trait;
use futures::StreamExt;
use url::Url;

use super::{StreamFormat, StreamHandle, StreamProvider, VideoMetadata};
use crate::config::HttpProviderConfig;
use crate::error::{DownloadError, Error, Result};

/// Production [`StreamProvider`] speaking HTTP
///
/// Metadata resolution issues `GET {resolver_url}?v=<video_id>` and expects
/// a [`VideoMetadata`] JSON document in response. Opening a format streams
/// its direct media URL, surfacing the response `content-length` (when
/// present) as the stream's total size.
pub struct HttpStreamProvider {
    client: reqwest::Client,
    config: HttpProviderConfig,
}

impl HttpStreamProvider {
    /// Build a provider from its configuration
    pub fn new(config: HttpProviderConfig) -> Result<Self> {
        // The configured timeout is applied per metadata request, not on the
        // client: a client-wide timeout would also bound the byte streams,
        // and a download has no deadline.
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl StreamProvider for HttpStreamProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn resolve(&self, video_id: &str) -> Result<VideoMetadata> {
        let base = self.config.resolver_url.as_deref().ok_or_else(|| {
            Error::Resolution("no metadata resolver endpoint configured".to_string())
        })?;

        let url = Url::parse_with_params(base, &[("v", video_id)])
            .map_err(|e| Error::Resolution(format!("invalid resolver URL '{base}': {e}")))?;

        let response = self
            .client
            .get(url)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Resolution(format!(
                "resolver returned {} for video '{video_id}'",
                response.status()
            )));
        }

        let body = response.text().await?;
        let metadata: VideoMetadata = serde_json::from_str(&body)?;

        tracing::debug!(
            video_id = %metadata.video_id,
            formats = metadata.formats.len(),
            "Resolved video metadata"
        );
        Ok(metadata)
    }

    async fn open(&self, format: &StreamFormat) -> Result<StreamHandle> {
        let url = format.url.as_deref().ok_or_else(|| {
            Error::Resolution(format!(
                "format '{}' has no direct media URL",
                format.quality_label
            ))
        })?;

        let response = self.client.get(url).send().await?.error_for_status()?;
        let total_size = response.content_length();

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| Error::Download(DownloadError::Stream(e.to_string()))))
            .boxed();

        Ok(StreamHandle { total_size, stream })
    }
}
