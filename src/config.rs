//! Configuration types for tube-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// HTTP stream provider configuration
///
/// Groups settings for the built-in [`HttpStreamProvider`](crate::provider::HttpStreamProvider).
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpProviderConfig {
    /// Metadata resolver endpoint. The provider issues
    /// `GET {resolver_url}?v=<video_id>` and expects a
    /// [`VideoMetadata`](crate::provider::VideoMetadata) JSON document.
    /// `None` disables metadata resolution.
    #[serde(default)]
    pub resolver_url: Option<String>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (default: 30s)
    ///
    /// Applies to metadata resolution. Byte streams are intentionally not
    /// bounded by a timeout; a stalled source stream leaves its job open.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            resolver_url: None,
            user_agent: default_user_agent(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Main configuration for [`VideoDownloader`](crate::VideoDownloader)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Download directory (default: "./downloads")
    ///
    /// Must already exist; the downloader never creates directories.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// HTTP provider settings
    #[serde(flatten)]
    pub http: HttpProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            http: HttpProviderConfig::default(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_user_agent() -> String {
    format!("tube-dl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}
