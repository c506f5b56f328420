//! Stream provider capability — the seam between the job lifecycle manager
//! and whatever actually resolves and fetches video streams.
//!
//! The core never talks to a video service directly. It asks a
//! [`StreamProvider`] for metadata and for an opened byte stream, which
//! keeps format negotiation and network fetching substitutable in tests.
//! [`http`] ships the production HTTP-backed implementation.

pub mod http;

pub use http::HttpStreamProvider;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::FormatFilter;

/// One downloadable stream variant of a video
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamFormat {
    /// Quality label shown to clients (e.g. "720p")
    pub quality_label: String,

    /// Container extension, appended to the output file name (e.g. "mp4")
    pub container: String,

    /// Whether the stream carries an audio track
    pub has_audio: bool,

    /// Whether the stream carries a video track
    pub has_video: bool,

    /// Direct media URL, when the provider resolves one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Metadata the provider resolves for a video identifier
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Canonical video identifier, the stable fallback for file naming
    pub video_id: String,

    /// Video title
    pub title: String,

    /// Available stream variants
    pub formats: Vec<StreamFormat>,
}

/// An opened byte stream plus what the provider knows about its length
pub struct StreamHandle {
    /// Total size in bytes, if the provider supplied a content length.
    /// Absent for chunked responses — percentage and ETA are then reported
    /// as undefined downstream.
    pub total_size: Option<u64>,

    /// The chunk stream. Errors mid-stream surface as
    /// [`DownloadError::Stream`](crate::error::DownloadError::Stream).
    pub stream: BoxStream<'static, Result<Bytes>>,
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle")
            .field("total_size", &self.total_size)
            .finish_non_exhaustive()
    }
}

/// Abstraction over stream resolution and fetching, enabling testability
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Name of the provider implementation (for logging)
    fn name(&self) -> &'static str;

    /// Resolve a video identifier into metadata and available formats
    async fn resolve(&self, video_id: &str) -> Result<VideoMetadata>;

    /// Open a byte stream for a chosen format
    async fn open(&self, format: &StreamFormat) -> Result<StreamHandle>;
}

/// Pick the first format matching the quality selector and layout filter
pub fn choose_format<'a>(
    formats: &'a [StreamFormat],
    quality: &str,
    filter: FormatFilter,
) -> Option<&'a StreamFormat> {
    formats
        .iter()
        .find(|f| f.quality_label == quality && matches_filter(f, filter))
}

/// Quality labels offered to clients: formats carrying both audio and
/// video, deduplicated in insertion order of first occurrence
pub fn quality_labels(formats: &[StreamFormat]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for format in formats {
        if format.has_audio
            && format.has_video
            && !labels.iter().any(|l| l == &format.quality_label)
        {
            labels.push(format.quality_label.clone());
        }
    }
    labels
}

fn matches_filter(format: &StreamFormat, filter: FormatFilter) -> bool {
    match filter {
        FormatFilter::AudioAndVideo => format.has_audio && format.has_video,
        FormatFilter::VideoOnly => format.has_video && !format.has_audio,
        FormatFilter::AudioOnly => format.has_audio && !format.has_video,
    }
}
