//! Streaming conversion API: observe progress as the service reports it.
//!
//! ## Why stream?
//!
//! A conversion takes anywhere from seconds to minutes, and the service
//! reports its progress in distinct phases (queued, downloading the source,
//! transcoding). A stream-based API lets callers surface each phase as it
//! happens — a progress bar, a status label — instead of blocking silently
//! until the end. Use [`crate::resolve`] instead when only the final result
//! matters.
//!
//! The stream is lazy: nothing touches the network until it is first
//! polled, and dropping it at any point cancels the session — in-flight
//! request and reschedule delay included — with no further requests issued.

use crate::config::ClientConfig;
use crate::error::ConversionError;
use crate::output::ProgressEvent;
use crate::protocol::{poll, submit};
use crate::transport::{HttpTransport, Transport};
use async_stream::try_stream;
use futures::StreamExt;
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;

/// A boxed stream of conversion progress events.
///
/// Yields zero or more non-terminal events, then terminates with exactly
/// one of: a [`ProgressEvent::Success`] item followed by completion, or a
/// single [`ConversionError`] item. Nothing is ever yielded after either.
pub type ProgressStream =
    Pin<Box<dyn Stream<Item = Result<ProgressEvent, ConversionError>> + Send>>;

/// Convert the media behind `media_url` to audio, streaming progress.
///
/// Submits the URL to the conversion service, then polls the job it
/// created every [`ClientConfig::poll_interval`] until it finishes. The
/// submission is part of the stream: a submit failure is the stream's
/// first and only item, and no polling happens.
///
/// # Example
/// ```rust,no_run
/// use futures::StreamExt;
/// use listube::{audio_stream, ClientConfig, ProgressEvent};
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = ClientConfig::default();
/// let mut events = audio_stream("https://www.youtube.com/watch?v=abc", &config);
/// while let Some(event) = events.next().await {
///     match event {
///         Ok(ProgressEvent::Success(result)) => println!("ready: {}", result.stream_url),
///         Ok(progress) => println!("{progress}"),
///         Err(e) => eprintln!("conversion failed: {e}"),
///     }
/// }
/// # }
/// ```
pub fn audio_stream(media_url: impl Into<String>, config: &ClientConfig) -> ProgressStream {
    let media_url = media_url.into();
    let config = config.clone();

    Box::pin(try_stream! {
        let transport = resolve_transport(&config)?;
        let handle = submit::submit(&transport, &config, &media_url).await?;

        let mut events = poll::status_stream(transport, handle, config.poll_interval);
        while let Some(event) = events.next().await {
            yield event?;
        }
    })
}

/// Resolve the transport from config, falling back to the built-in
/// reqwest-backed one.
fn resolve_transport(config: &ClientConfig) -> Result<Arc<dyn Transport>, ConversionError> {
    if let Some(ref transport) = config.transport {
        return Ok(Arc::clone(transport));
    }

    let transport = HttpTransport::new(config.request_timeout, &config.user_agent)?;
    Ok(Arc::new(transport))
}
