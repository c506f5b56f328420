//! Process-wide registry of in-flight download jobs.
//!
//! The registry is the only state shared across jobs. It maps a
//! [`JobId`] to the job's cancellation token so that a cancellation request
//! arriving from one execution context is reliably observed by the
//! chunk-processing context of another. The token transitions false→true at
//! most once and reads never tear — a flag read racing a concurrent cancel
//! observes either the old or the new value.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::{DownloadError, Error, Result};
use crate::types::JobId;

/// Handle to one registered job
#[derive(Clone, Debug)]
pub struct JobHandle {
    cancel: CancellationToken,
    started_at: DateTime<Utc>,
}

impl JobHandle {
    /// Create a handle with a fresh cancellation token, stamped "now"
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            started_at: Utc::now(),
        }
    }

    /// Clone of the job's cancellation token, for chunk-boundary checks
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether cancellation has been requested for this job
    pub fn is_cancel_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// When the job's byte stream started producing data
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Default for JobHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Task-safe table of in-flight jobs, keyed by job id
///
/// Cloning is cheap; all clones share the same table. The registry is
/// injected into the downloader and its jobs rather than reached through
/// global state, so tests can substitute their own instance.
#[derive(Clone, Debug, Default)]
pub struct JobRegistry {
    jobs: Arc<tokio::sync::Mutex<HashMap<JobId, JobHandle>>>,
}

impl JobRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job under its id
    ///
    /// Fails with [`DownloadError::DuplicateJob`] if the id is already
    /// present. Identifier generation makes a collision all but impossible,
    /// but the invariant is checked rather than assumed.
    pub async fn register(&self, id: JobId, handle: JobHandle) -> Result<()> {
        let mut jobs = self.jobs.lock().await;
        if jobs.contains_key(&id) {
            return Err(Error::Download(DownloadError::DuplicateJob { id }));
        }
        jobs.insert(id, handle);
        Ok(())
    }

    /// Request cancellation of a job
    ///
    /// Sets the job's cancellation flag if it is still registered and
    /// returns `true`. A request for a job that is already gone is a silent
    /// no-op returning `false` — cancellation is inherently racy against
    /// natural completion, and a late request for a finished job is not an
    /// error.
    pub async fn request_cancel(&self, id: JobId) -> bool {
        let jobs = self.jobs.lock().await;
        match jobs.get(&id) {
            Some(handle) => {
                handle.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Look up a registered job
    pub async fn get(&self, id: JobId) -> Result<JobHandle> {
        let jobs = self.jobs.lock().await;
        jobs.get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Deregister a job. Idempotent; returns whether it was present.
    pub async fn remove(&self, id: JobId) -> bool {
        let mut jobs = self.jobs.lock().await;
        jobs.remove(&id).is_some()
    }

    /// Flag every registered job as cancelled
    ///
    /// Used by graceful shutdown. Each job observes the flag at its next
    /// chunk boundary and aborts with normal cleanup.
    pub async fn cancel_all(&self) {
        let jobs = self.jobs.lock().await;
        for handle in jobs.values() {
            handle.cancel.cancel();
        }
    }

    /// Number of in-flight jobs
    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    /// Whether no jobs are in flight
    pub async fn is_empty(&self) -> bool {
        self.jobs.lock().await.is_empty()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_get_returns_the_handle() {
        let registry = JobRegistry::new();
        let id = JobId::new();
        registry.register(id, JobHandle::new()).await.unwrap();

        let handle = registry.get(id).await.unwrap();
        assert!(!handle.is_cancel_requested());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn register_duplicate_id_fails() {
        let registry = JobRegistry::new();
        let id = JobId::new();
        registry.register(id, JobHandle::new()).await.unwrap();

        let err = registry.register(id, JobHandle::new()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Download(DownloadError::DuplicateJob { id: dup }) if dup == id
        ));
        // The original registration survives the rejected duplicate
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn get_unknown_job_signals_not_found() {
        let registry = JobRegistry::new();
        let err = registry.get(JobId::new()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn request_cancel_flags_a_live_job() {
        let registry = JobRegistry::new();
        let id = JobId::new();
        let handle = JobHandle::new();
        let token = handle.token();
        registry.register(id, handle).await.unwrap();

        assert!(registry.request_cancel(id).await);
        assert!(token.is_cancelled(), "the job's own token clone must observe the flag");
    }

    #[tokio::test]
    async fn request_cancel_for_missing_job_is_a_silent_noop() {
        let registry = JobRegistry::new();
        assert!(!registry.request_cancel(JobId::new()).await);
    }

    #[tokio::test]
    async fn request_cancel_twice_is_idempotent() {
        let registry = JobRegistry::new();
        let id = JobId::new();
        let handle = JobHandle::new();
        let token = handle.token();
        registry.register(id, handle).await.unwrap();

        assert!(registry.request_cancel(id).await);
        assert!(registry.request_cancel(id).await);
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let registry = JobRegistry::new();
        let id = JobId::new();
        registry.register(id, JobHandle::new()).await.unwrap();

        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn cancel_all_flags_every_registered_job() {
        let registry = JobRegistry::new();
        let mut tokens = Vec::new();
        for _ in 0..3 {
            let handle = JobHandle::new();
            tokens.push(handle.token());
            registry.register(JobId::new(), handle).await.unwrap();
        }

        registry.cancel_all().await;
        assert!(tokens.iter().all(|t| t.is_cancelled()));
        // cancel_all flags jobs; each job deregisters itself at its own
        // terminal transition
        assert_eq!(registry.len().await, 3);
    }

    #[tokio::test]
    async fn cancellation_from_another_task_is_observed() {
        let registry = JobRegistry::new();
        let id = JobId::new();
        let handle = JobHandle::new();
        let token = handle.token();
        registry.register(id, handle).await.unwrap();

        let remote = registry.clone();
        tokio::spawn(async move {
            remote.request_cancel(id).await;
        })
        .await
        .unwrap();

        assert!(token.is_cancelled());
    }
}
