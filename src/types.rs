//! Core types for tube-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unique identifier for a download job
///
/// Generated at job start and used as the correlation key across the event
/// channel and for cancellation targeting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub uuid::Uuid);

impl JobId {
    /// Generate a fresh random job id
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Get the inner UUID value
    pub fn get(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<uuid::Uuid> for JobId {
    fn from(id: uuid::Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Which stream layout a download request is asking for
///
/// Mirrors the format filter a client sends alongside the quality selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatFilter {
    /// Muxed streams carrying both audio and video
    #[default]
    AudioAndVideo,
    /// Video-only streams
    VideoOnly,
    /// Audio-only streams
    AudioOnly,
}

/// A client's download request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Remote video identifier to download
    pub video_id: String,

    /// Desired quality label (e.g. "720p")
    pub quality: String,

    /// Stream layout filter
    #[serde(default)]
    pub filter: FormatFilter,
}

/// Event emitted during the download lifecycle
///
/// Delivered to the originating client over its per-request
/// [`EventChannel`](crate::events::EventChannel). Progress values are
/// advisory/display-only and are never used for control decisions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The byte stream has started; carries the job id the client needs to
    /// target a later cancellation
    DownloadStart {
        /// Job ID
        id: JobId,
    },

    /// Progress update, emitted once per committed chunk
    DownloadProgress {
        /// Job ID
        id: JobId,
        /// Cumulative bytes received so far
        bytes_received: u64,
        /// Total size in bytes, if the provider supplied a content length
        #[serde(skip_serializing_if = "Option::is_none")]
        total_size: Option<u64>,
        /// Progress percentage (ceiling), absent when the total is unknown
        #[serde(skip_serializing_if = "Option::is_none")]
        percentage: Option<u32>,
        /// Instantaneous speed in bytes per millisecond, absent on the
        /// first sample
        #[serde(skip_serializing_if = "Option::is_none")]
        speed: Option<f64>,
        /// Estimated seconds until completion, absent when total or speed
        /// is unknown
        #[serde(skip_serializing_if = "Option::is_none")]
        eta_seconds: Option<f64>,
    },

    /// The job was cancelled and its partial output removed
    DownloadAborted {
        /// Job ID
        id: JobId,
        /// Human-readable abort message
        message: String,
    },

    /// The download completed successfully
    End {
        /// Job ID
        id: JobId,
        /// Human-readable completion message
        message: String,
        /// Final output path
        path: PathBuf,
        /// Final file name
        name: String,
    },

    /// The source stream or output sink failed
    DownloadError {
        /// Job ID
        id: JobId,
        /// Error description
        message: String,
    },
}

/// Terminal status of a download job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalStatus {
    /// Completed successfully
    Done,
    /// Cancelled by the client
    Aborted,
    /// Failed with a stream or sink error
    Error,
}

/// Terminal result returned to the original caller of a download request
///
/// Exactly one outcome is produced per started job, regardless of how the
/// job ended — stream failures resolve into an `Error` outcome rather than
/// propagating across the async boundary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadOutcome {
    /// How the job terminated
    pub status: TerminalStatus,

    /// Final output path (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Final file name (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Human-readable summary
    pub message: String,
}

impl DownloadOutcome {
    /// Successful completion with the final path and file name
    pub fn done(path: PathBuf, name: String) -> Self {
        Self {
            status: TerminalStatus::Done,
            path: Some(path),
            name: Some(name),
            message: "Download complete".to_string(),
        }
    }

    /// Cancelled by the client
    pub fn aborted() -> Self {
        Self {
            status: TerminalStatus::Aborted,
            path: None,
            name: None,
            message: "Download aborted".to_string(),
        }
    }

    /// Failed with the given description
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: TerminalStatus::Error,
            path: None,
            name: None,
            message: message.into(),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn job_id_round_trips_through_display_and_from_str() {
        let id = JobId::new();
        let parsed = JobId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn job_id_from_str_rejects_non_uuid() {
        assert!(JobId::from_str("not-a-uuid").is_err());
        assert!(JobId::from_str("").is_err());
    }

    #[test]
    fn job_ids_are_unique() {
        // v4 collisions are astronomically unlikely; this guards against a
        // broken constructor returning a constant
        let a = JobId::new();
        let b = JobId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn format_filter_serializes_lowercase() {
        let json = serde_json::to_string(&FormatFilter::AudioAndVideo).unwrap();
        assert_eq!(json, r#""audioandvideo""#);
        let parsed: FormatFilter = serde_json::from_str(r#""videoonly""#).unwrap();
        assert_eq!(parsed, FormatFilter::VideoOnly);
    }

    #[test]
    fn download_request_filter_defaults_to_audio_and_video() {
        let req: DownloadRequest =
            serde_json::from_str(r#"{"video_id":"abc123","quality":"720p"}"#).unwrap();
        assert_eq!(req.filter, FormatFilter::AudioAndVideo);
    }

    #[test]
    fn event_serializes_with_snake_case_type_tag() {
        let event = Event::DownloadStart { id: JobId::new() };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "download_start");
    }

    #[test]
    fn progress_event_omits_absent_optionals() {
        let event = Event::DownloadProgress {
            id: JobId::new(),
            bytes_received: 10,
            total_size: None,
            percentage: None,
            speed: None,
            eta_seconds: None,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "download_progress");
        assert_eq!(value["bytes_received"], 10);
        assert!(
            value.get("percentage").is_none(),
            "undefined percentage must be omitted, not serialized as null or zero"
        );
        assert!(value.get("eta_seconds").is_none());
    }

    #[test]
    fn outcome_constructors_set_terminal_status() {
        let done = DownloadOutcome::done(PathBuf::from("/tmp/a.mp4"), "a.mp4".to_string());
        assert_eq!(done.status, TerminalStatus::Done);
        assert_eq!(done.name.as_deref(), Some("a.mp4"));

        let aborted = DownloadOutcome::aborted();
        assert_eq!(aborted.status, TerminalStatus::Aborted);
        assert!(aborted.path.is_none());

        let error = DownloadOutcome::error("stream died");
        assert_eq!(error.status, TerminalStatus::Error);
        assert_eq!(error.message, "stream died");
    }

    #[test]
    fn terminal_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TerminalStatus::Aborted).unwrap(),
            r#""aborted""#
        );
    }
}
