//! # listube
//!
//! Resolve a media page URL (e.g. a YouTube watch URL) to a downloadable
//! audio stream by driving the ListenToYouTube conversion cloud.
//!
//! ## Why this crate?
//!
//! The conversion cloud is an asynchronous, ticket-based service: you
//! submit a URL, the service creates a job, and you poll an opaque status
//! URL while the job moves through its phases. Its responses are
//! script-wrapped (JSONP) rather than plain JSON, progress percentages
//! arrive as string-encoded integers, and transitional responses may lack
//! a status block entirely. This crate hides all of that behind a single
//! ordered stream of typed progress events that terminates in success or
//! failure exactly once.
//!
//! The crate resolves a final stream URL and title — it does not download
//! or transcode media; fetching the audio bytes is the caller's business.
//!
//! ## Protocol Overview
//!
//! ```text
//! media URL
//!  │
//!  ├─ 1. Submit  POST cc/conversioncloud.php, decode JSONP → status URL
//!  ├─ 2. Poll    GET {statusurl}&json every 3 s, decode step + percent
//!  │             ticket ▸ waiting   convert/download ▸ percent events
//!  └─ 3. Finish  step "finished" → stream URL + title, stream completes
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use listube::{resolve, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::default();
//!     let result = resolve("https://www.youtube.com/watch?v=Lx_wbGNh2zU", &config).await?;
//!     println!("{} → {}", result.title, result.stream_url);
//!     Ok(())
//! }
//! ```
//!
//! Prefer [`audio_stream`] to observe every progress event, and inject a
//! [`ProgressObserver`] through the config builder to receive callbacks
//! from the eager [`resolve`] path.
//!
//! ## Cancellation
//!
//! Polling is unbounded by design — the service owns timeout policy. To
//! bound a conversion, drop the stream (or wrap `resolve` in
//! `tokio::time::timeout`); the session stops at its next await point and
//! issues no further requests.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod progress;
pub mod resolve;
pub mod stream;
pub mod transport;

mod protocol;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::ConversionError;
pub use output::{ConversionResult, ProgressEvent};
pub use progress::{NoopProgressObserver, ProgressObserver, SharedObserver};
pub use resolve::resolve;
pub use stream::{audio_stream, ProgressStream};
pub use transport::{HttpTransport, Transport, TransportError};
