//! Error types for tube-dl
//!
//! Two layers, following the split between request-time and job-time failures:
//! - [`Error`] covers everything a caller can see from the public API
//! - [`DownloadError`] covers failures inside a running download job
//!
//! Failures that occur after a job has started never propagate as `Err` —
//! the job converts them into a terminal event and a resolved
//! [`DownloadOutcome`](crate::types::DownloadOutcome). Only resolution-time
//! errors (before a job exists) surface as request failures.

use thiserror::Error;

use crate::types::JobId;

/// Result type alias for tube-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tube-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Stream provider cannot find or negotiate a matching format
    #[error("resolution error: {0}")]
    Resolution(String),

    /// Download-related error
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Job not found in the registry
    #[error("job not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised inside a running download job
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Identifier collision in the job registry. Should not occur given
    /// random id generation, but is checked rather than assumed.
    #[error("job {id} is already registered")]
    DuplicateJob {
        /// The colliding job id
        id: JobId,
    },

    /// The source byte stream failed after it started producing data
    #[error("source stream failed: {0}")]
    Stream(String),

    /// Writing to the output sink failed. Treated as a stream failure for
    /// job-lifecycle purposes.
    #[error("output sink failed: {0}")]
    Sink(String),

    /// Deleting partial output during abort failed. Logged, non-fatal, and
    /// never changes the reported "aborted" status.
    #[error("partial file cleanup failed: {0}")]
    Cleanup(String),
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_error_converts_into_error() {
        let err: Error = DownloadError::Stream("connection reset".to_string()).into();
        assert!(matches!(err, Error::Download(DownloadError::Stream(_))));
        assert_eq!(
            err.to_string(),
            "download error: source stream failed: connection reset"
        );
    }

    #[test]
    fn duplicate_job_message_names_the_id() {
        let id = JobId::new();
        let err = DownloadError::DuplicateJob { id };
        assert!(
            err.to_string().contains(&id.to_string()),
            "duplicate-job message should carry the colliding id for the logs"
        );
    }

    #[test]
    fn io_error_converts_into_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
