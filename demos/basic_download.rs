//! Basic download example
//!
//! This example demonstrates the core functionality of tube-dl:
//! - Configuring the HTTP stream provider
//! - Creating a downloader instance
//! - Listing available qualities
//! - Running a download with a per-request event channel

use tube_dl::{Config, DownloadRequest, Event, EventChannel, HttpProviderConfig, VideoDownloader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Build configuration — the resolver endpoint returns VideoMetadata
    // JSON for `GET {resolver_url}?v=<video_id>`
    let config = Config {
        download_dir: "downloads".into(),
        http: HttpProviderConfig {
            resolver_url: Some("http://localhost:9000/info".to_string()),
            ..Default::default()
        },
    };

    // Create downloader instance
    let downloader = VideoDownloader::with_http_provider(config)?;

    // List the qualities on offer
    let qualities = downloader.resolve_qualities("dQw4w9WgXcQ").await?;
    println!("Available qualities: {:?}", qualities);

    // Per-request event channel; in a server you would forward these to
    // the requesting client over its own connection
    let (events, mut rx) = EventChannel::pair();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                Event::DownloadStart { id } => {
                    println!("✓ Started job {}", id);
                }
                Event::DownloadProgress {
                    bytes_received,
                    percentage,
                    speed,
                    ..
                } => {
                    println!(
                        "⬇ {} bytes ({}%) @ {:.2} KB/s",
                        bytes_received,
                        percentage.map_or("?".to_string(), |p| p.to_string()),
                        speed.unwrap_or(0.0), // bytes/ms == KB/s
                    );
                }
                Event::End { path, name, .. } => {
                    println!("✓ Complete: {} at {:?}", name, path);
                }
                Event::DownloadAborted { message, .. } => {
                    println!("✗ Aborted: {}", message);
                }
                Event::DownloadError { message, .. } => {
                    println!("✗ Failed: {}", message);
                }
            }
        }
    });

    // Run the download to its terminal state
    let outcome = downloader
        .download(
            DownloadRequest {
                video_id: "dQw4w9WgXcQ".to_string(),
                quality: qualities.first().cloned().unwrap_or("720p".to_string()),
                filter: Default::default(),
            },
            events,
        )
        .await?;

    println!("Terminal status: {:?} — {}", outcome.status, outcome.message);

    Ok(())
}
