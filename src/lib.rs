//! # tube-dl
//!
//! Embeddable backend library for video download applications.
//!
//! ## Design Philosophy
//!
//! tube-dl is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Each request gets its own event channel, no polling
//! - **Transport-agnostic** - HTTP/WebSocket routing lives outside the crate
//! - **Cancellable** - Every job honors a cooperative cancellation flag
//!
//! The core is the download job lifecycle manager: one registered job per
//! client request, progress/speed/ETA derived from the byte stream,
//! asynchronous cancellation over a side channel, and guaranteed cleanup of
//! partial output on abort.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tube_dl::{Config, DownloadRequest, EventChannel, VideoDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         http: tube_dl::HttpProviderConfig {
//!             resolver_url: Some("http://localhost:9000/info".to_string()),
//!             ..Default::default()
//!         },
//!         ..Default::default()
//!     };
//!
//!     let downloader = VideoDownloader::with_http_provider(config)?;
//!
//!     // Per-request event channel; forward the receiver to your client
//!     let (events, mut rx) = EventChannel::pair();
//!     tokio::spawn(async move {
//!         while let Some(event) = rx.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let outcome = downloader
//!         .download(
//!             DownloadRequest {
//!                 video_id: "dQw4w9WgXcQ".to_string(),
//!                 quality: "720p".to_string(),
//!                 filter: Default::default(),
//!             },
//!             events,
//!         )
//!         .await?;
//!     println!("Terminal status: {:?}", outcome.status);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Core downloader implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Per-request event delivery
pub mod events;
/// Progress, speed, and ETA derivation
pub mod progress;
/// Stream provider capability and the HTTP implementation
pub mod provider;
/// Registry of in-flight jobs
pub mod registry;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{Config, HttpProviderConfig};
pub use downloader::VideoDownloader;
pub use error::{DownloadError, Error, Result};
pub use events::{EventChannel, EventReceiver};
pub use progress::{Progress, ProgressTracker};
pub use provider::{
    HttpStreamProvider, StreamFormat, StreamHandle, StreamProvider, VideoMetadata,
};
pub use registry::{JobHandle, JobRegistry};
pub use types::{
    DownloadOutcome, DownloadRequest, Event, FormatFilter, JobId, TerminalStatus,
};

/// Helper function to run the downloader with graceful signal handling.
///
/// Waits for a termination signal and then flags every in-flight job as
/// cancelled via the downloader's `shutdown()` method; each job aborts with
/// normal cleanup at its next chunk boundary.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use tube_dl::{Config, VideoDownloader, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = VideoDownloader::with_http_provider(Config::default())?;
///
///     // Run with automatic signal handling
///     run_with_shutdown(downloader).await;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: VideoDownloader) {
    wait_for_signal().await;
    downloader.shutdown().await;
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
