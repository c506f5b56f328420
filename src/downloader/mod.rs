//! Core downloader implementation split into focused submodules.
//!
//! The `VideoDownloader` struct and its methods are organized by domain:
//! - [`job`] - Per-job download execution state machine
//! - [`filename`] - Output file naming

mod filename;
mod job;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::EventChannel;
use crate::progress::ProgressTracker;
use crate::provider::{HttpStreamProvider, StreamProvider, choose_format, quality_labels};
use crate::registry::{JobHandle, JobRegistry};
use crate::types::{DownloadOutcome, DownloadRequest, JobId};

use filename::output_file_name;
use job::{DownloadJobContext, run_download_job};

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
///
/// The orchestrator over the asynchronous job machinery: it resolves a
/// request against the stream provider, runs one registered
/// [`DownloadJob`](job) per request, and returns the terminal result to the
/// original caller. Many jobs run concurrently and independently; the only
/// state they share is the injected [`JobRegistry`].
#[derive(Clone)]
pub struct VideoDownloader {
    /// Stream provider collaborator (trait object for pluggable implementations)
    provider: Arc<dyn StreamProvider>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    config: Arc<Config>,
    /// Table of in-flight jobs, shared with every running job
    registry: JobRegistry,
}

impl VideoDownloader {
    /// Create a downloader backed by the given stream provider
    pub fn new(config: Config, provider: Arc<dyn StreamProvider>) -> Self {
        Self {
            provider,
            config: Arc::new(config),
            registry: JobRegistry::new(),
        }
    }

    /// Create a downloader backed by the built-in [`HttpStreamProvider`],
    /// configured from `config.http`
    pub fn with_http_provider(config: Config) -> Result<Self> {
        let provider = HttpStreamProvider::new(config.http.clone())?;
        Ok(Self::new(config, Arc::new(provider)))
    }

    /// Get the current configuration
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// The registry of in-flight jobs
    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    /// Resolve the quality labels available for a video
    ///
    /// Only formats carrying both audio and video are offered. Labels are
    /// deduplicated in insertion order of first occurrence.
    pub async fn resolve_qualities(&self, video_id: &str) -> Result<Vec<String>> {
        let metadata = self.provider.resolve(video_id).await?;
        Ok(quality_labels(&metadata.formats))
    }

    /// Run one download to its terminal state
    ///
    /// Resolves the request against the stream provider, registers a job,
    /// and pumps the byte stream to disk while emitting lifecycle events on
    /// `events`. Does not return until the job terminates; the returned
    /// [`DownloadOutcome`] reports done, aborted, or error.
    ///
    /// # Errors
    ///
    /// Only resolution-time failures (no matching format, provider
    /// unreachable, identifier collision) return `Err` — once the job has
    /// started, every failure resolves into an `Error` outcome instead.
    pub async fn download(
        &self,
        request: DownloadRequest,
        events: EventChannel,
    ) -> Result<DownloadOutcome> {
        let metadata = self.provider.resolve(&request.video_id).await?;

        let format = choose_format(&metadata.formats, &request.quality, request.filter)
            .ok_or_else(|| {
                Error::Resolution(format!(
                    "no {:?} format with quality '{}' for video '{}'",
                    request.filter, request.quality, metadata.video_id
                ))
            })?;

        let file_name = output_file_name(&metadata.title, &metadata.video_id, &format.container);
        let output_path = self.config.download_dir.join(&file_name);

        // Starting: open the stream, record the start time on first
        // response, then register the job
        let handle = self.provider.open(format).await?;
        let tracker = ProgressTracker::new(handle.total_size);

        let id = JobId::new();
        let job = JobHandle::new();
        let cancel = job.token();
        if let Err(e) = self.registry.register(id, job).await {
            tracing::error!(job_id = %id, error = %e, "Failed to register download job");
            return Err(e);
        }

        tracing::info!(
            job_id = %id,
            video_id = %metadata.video_id,
            quality = %format.quality_label,
            provider = self.provider.name(),
            path = ?output_path,
            total_size = ?handle.total_size,
            "Starting download job"
        );

        let ctx = DownloadJobContext {
            id,
            registry: self.registry.clone(),
            events,
            cancel,
            tracker,
            output_path,
            file_name,
        };
        Ok(run_download_job(ctx, handle).await)
    }

    /// Request cancellation of a running job
    ///
    /// Fire-and-forget side channel: the job observes the flag at its next
    /// chunk boundary and aborts with cleanup. Returns whether a live job
    /// was flagged — a request for an unknown or already-finished job is a
    /// silent no-op.
    pub async fn cancel(&self, id: JobId) -> bool {
        let flagged = self.registry.request_cancel(id).await;
        if flagged {
            tracing::info!(job_id = %id, "Cancellation requested");
        } else {
            tracing::debug!(job_id = %id, "Cancellation for unknown or finished job ignored");
        }
        flagged
    }

    /// Flag every in-flight job as cancelled
    ///
    /// Each job aborts with normal cleanup at its next chunk boundary; a
    /// stalled source stream delays that observation.
    pub async fn shutdown(&self) {
        let active = self.registry.len().await;
        tracing::info!(active_jobs = active, "Shutting down - cancelling active downloads");
        self.registry.cancel_all().await;
    }
}
