//! Mid-flight cancellation example
//!
//! Starts a download, then cancels it from another task once the first
//! progress event arrives — the job aborts at its next chunk boundary and
//! removes the partial file.

use tube_dl::{Config, DownloadRequest, Event, EventChannel, HttpProviderConfig, VideoDownloader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config {
        download_dir: "downloads".into(),
        http: HttpProviderConfig {
            resolver_url: Some("http://localhost:9000/info".to_string()),
            ..Default::default()
        },
    };

    let downloader = VideoDownloader::with_http_provider(config)?;

    let (events, mut rx) = EventChannel::pair();

    // Watch the event channel: grab the job id from DownloadStart, cancel
    // after the first progress report
    let canceller = downloader.clone();
    tokio::spawn(async move {
        let mut job_id = None;
        while let Some(event) = rx.recv().await {
            match event {
                Event::DownloadStart { id } => {
                    println!("✓ Started job {}", id);
                    job_id = Some(id);
                }
                Event::DownloadProgress { bytes_received, .. } => {
                    println!("⬇ {} bytes — requesting cancellation", bytes_received);
                    if let Some(id) = job_id {
                        canceller.cancel(id).await;
                    }
                }
                Event::DownloadAborted { message, .. } => {
                    println!("✗ {}", message);
                }
                other => println!("Event: {:?}", other),
            }
        }
    });

    let outcome = downloader
        .download(
            DownloadRequest {
                video_id: "dQw4w9WgXcQ".to_string(),
                quality: "720p".to_string(),
                filter: Default::default(),
            },
            events,
        )
        .await?;

    // The request resolves with an "aborted" outcome, not an error
    println!("Terminal status: {:?} — {}", outcome.status, outcome.message);

    Ok(())
}
