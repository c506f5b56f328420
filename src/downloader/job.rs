//! Download job execution — the per-job state machine.
//!
//! One job drives one download end-to-end:
//! `Starting → Streaming → {Completing | Aborting | Failing} → Terminated`.
//! Exactly one terminal transition fires, the job is deregistered at that
//! transition, and every failure inside the job resolves into a
//! [`DownloadOutcome`] rather than propagating as an error.

use futures::StreamExt;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::error::DownloadError;
use crate::events::EventChannel;
use crate::progress::ProgressTracker;
use crate::provider::StreamHandle;
use crate::registry::JobRegistry;
use crate::types::{DownloadOutcome, Event, JobId};

/// Shared context for a single download job, reducing parameter passing
/// between the terminal helpers.
pub(crate) struct DownloadJobContext {
    pub(crate) id: JobId,
    pub(crate) registry: JobRegistry,
    pub(crate) events: EventChannel,
    pub(crate) cancel: CancellationToken,
    pub(crate) tracker: ProgressTracker,
    pub(crate) output_path: PathBuf,
    pub(crate) file_name: String,
}

/// Core download job — pumps the byte stream into the output sink.
///
/// The caller has already opened the stream, recorded the start time in the
/// tracker, and registered the job. This function owns everything from the
/// output sink onward, including deregistration at the terminal transition.
pub(crate) async fn run_download_job(
    ctx: DownloadJobContext,
    handle: StreamHandle,
) -> DownloadOutcome {
    let id = ctx.id;

    let mut sink = match tokio::fs::File::create(&ctx.output_path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::error!(job_id = %id, path = ?ctx.output_path, error = %e, "Failed to create output sink");
            let reason = DownloadError::Sink(e.to_string());
            return fail(&ctx, reason.to_string()).await;
        }
    };

    // The client needs the id before it can target a cancellation
    ctx.events.emit(Event::DownloadStart { id });

    let total_size = ctx.tracker.total_size();
    let mut bytes_received: u64 = 0;
    let mut stream = handle.stream;

    while let Some(next) = stream.next().await {
        let chunk = match next {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::error!(job_id = %id, error = %e, "Source stream failed");
                drop(sink);
                return fail(&ctx, e.to_string()).await;
            }
        };

        // Cancellation wins over committing this chunk: nothing from a
        // cancelled chunk is written or counted
        if ctx.cancel.is_cancelled() {
            drop(sink);
            return abort(&ctx).await;
        }

        bytes_received += chunk.len() as u64;

        if let Err(e) = sink.write_all(&chunk).await {
            // Sink failure is a stream failure for lifecycle purposes; the
            // sink is closed but partial output is not guaranteed gone
            tracing::error!(job_id = %id, path = ?ctx.output_path, error = %e, "Output sink write failed");
            let reason = DownloadError::Sink(e.to_string());
            drop(sink);
            return fail(&ctx, reason.to_string()).await;
        }

        let progress = ctx.tracker.sample(bytes_received);
        ctx.events.emit(Event::DownloadProgress {
            id,
            bytes_received,
            total_size,
            percentage: progress.percentage,
            speed: progress.speed,
            eta_seconds: progress.eta_seconds,
        });
    }

    // Completing: end of source data
    if let Err(e) = sink.flush().await {
        tracing::error!(job_id = %id, path = ?ctx.output_path, error = %e, "Failed to finalize output sink");
        let reason = DownloadError::Sink(e.to_string());
        drop(sink);
        return fail(&ctx, reason.to_string()).await;
    }
    drop(sink);

    ctx.registry.remove(id).await;
    ctx.events.emit(Event::End {
        id,
        message: "Download complete".to_string(),
        path: ctx.output_path.clone(),
        name: ctx.file_name.clone(),
    });
    tracing::info!(
        job_id = %id,
        path = ?ctx.output_path,
        bytes_received = bytes_received,
        "Download complete"
    );
    DownloadOutcome::done(ctx.output_path, ctx.file_name)
}

/// Aborting: delete partial output, deregister, emit `DownloadAborted`.
async fn abort(ctx: &DownloadJobContext) -> DownloadOutcome {
    match tokio::fs::remove_file(&ctx.output_path).await {
        Ok(()) => {}
        // The file may never have been created
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            let cleanup = DownloadError::Cleanup(e.to_string());
            tracing::warn!(
                job_id = %ctx.id,
                path = ?ctx.output_path,
                error = %cleanup,
                "Failed to delete partial output"
            );
            // Non-fatal: the reported status stays "aborted"
        }
    }

    ctx.registry.remove(ctx.id).await;
    ctx.events.emit(Event::DownloadAborted {
        id: ctx.id,
        message: "Download aborted".to_string(),
    });
    tracing::info!(job_id = %ctx.id, "Download aborted");
    DownloadOutcome::aborted()
}

/// Failing: deregister and emit `DownloadError`. The sink is already
/// closed by the caller; partial output deletion is not guaranteed here.
async fn fail(ctx: &DownloadJobContext, message: String) -> DownloadOutcome {
    ctx.registry.remove(ctx.id).await;
    ctx.events.emit(Event::DownloadError {
        id: ctx.id,
        message: message.clone(),
    });
    DownloadOutcome::error(message)
}
