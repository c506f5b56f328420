//! Scripted stream providers shared by the downloader lifecycle tests.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::error::Result;
use crate::provider::{StreamFormat, StreamHandle, StreamProvider, VideoMetadata};

/// A muxed (audio + video) format with the given quality label
pub(crate) fn muxed_format(quality: &str, container: &str) -> StreamFormat {
    StreamFormat {
        quality_label: quality.to_string(),
        container: container.to_string(),
        has_audio: true,
        has_video: true,
        url: None,
    }
}

/// Metadata for a test video
pub(crate) fn metadata(video_id: &str, title: &str, formats: Vec<StreamFormat>) -> VideoMetadata {
    VideoMetadata {
        video_id: video_id.to_string(),
        title: title.to_string(),
        formats,
    }
}

/// Provider that plays back a fixed list of chunks, optionally ending with
/// a stream error
pub(crate) struct StaticProvider {
    pub(crate) metadata: VideoMetadata,
    pub(crate) total_size: Option<u64>,
    pub(crate) chunks: Vec<Vec<u8>>,
    pub(crate) trailing_error: Option<String>,
}

#[async_trait]
impl StreamProvider for StaticProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn resolve(&self, _video_id: &str) -> Result<VideoMetadata> {
        Ok(self.metadata.clone())
    }

    async fn open(&self, _format: &StreamFormat) -> Result<StreamHandle> {
        let mut items: Vec<Result<Bytes>> = self
            .chunks
            .iter()
            .cloned()
            .map(|c| Ok(Bytes::from(c)))
            .collect();
        if let Some(message) = &self.trailing_error {
            items.push(Err(crate::error::DownloadError::Stream(message.clone()).into()));
        }
        Ok(StreamHandle {
            total_size: self.total_size,
            stream: futures::stream::iter(items).boxed(),
        })
    }
}

/// Provider whose chunk delivery is driven by the test through a channel,
/// for deterministic interleaving of chunks and cancellation
pub(crate) struct PipeProvider {
    metadata: VideoMetadata,
    total_size: Option<u64>,
    rx: std::sync::Mutex<Option<tokio::sync::mpsc::UnboundedReceiver<Result<Bytes>>>>,
}

impl PipeProvider {
    pub(crate) fn new(
        metadata: VideoMetadata,
        total_size: Option<u64>,
    ) -> (Self, tokio::sync::mpsc::UnboundedSender<Result<Bytes>>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (
            Self {
                metadata,
                total_size,
                rx: std::sync::Mutex::new(Some(rx)),
            },
            tx,
        )
    }
}

#[async_trait]
impl StreamProvider for PipeProvider {
    fn name(&self) -> &'static str {
        "pipe"
    }

    async fn resolve(&self, _video_id: &str) -> Result<VideoMetadata> {
        Ok(self.metadata.clone())
    }

    async fn open(&self, _format: &StreamFormat) -> Result<StreamHandle> {
        let rx = self
            .rx
            .lock()
            .unwrap()
            .take()
            .expect("PipeProvider supports a single open() per test");
        Ok(StreamHandle {
            total_size: self.total_size,
            stream: UnboundedReceiverStream::new(rx).boxed(),
        })
    }
}
