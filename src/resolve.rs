//! Eager conversion entry point.
//!
//! ## Why eager vs. streaming?
//!
//! This module provides the simpler API: await one future, get the final
//! stream URL and title. Progress events are forwarded to the
//! [`crate::ProgressObserver`] configured on the client (if any) and
//! otherwise discarded. Use [`crate::audio_stream`] instead when the
//! events themselves are the point.
//!
//! There is no internal timeout — a job the service never finishes is
//! polled forever. Callers bound the wait by racing this future against a
//! deadline (`tokio::time::timeout`); dropping it cancels the session.

use crate::config::ClientConfig;
use crate::error::ConversionError;
use crate::output::{ConversionResult, ProgressEvent};
use crate::stream::audio_stream;
use futures::StreamExt;
use tracing::{debug, info};

/// Convert the media behind `media_url` to audio and wait for the result.
///
/// # Arguments
/// * `media_url` — URL of the media page (e.g. a YouTube watch URL)
/// * `config`    — client configuration; its observer receives progress
///
/// # Errors
/// Any terminal [`ConversionError`]: transport failure, an unevaluable or
/// malformed service response, or a finished job with an invalid download
/// URL.
pub async fn resolve(
    media_url: impl AsRef<str>,
    config: &ClientConfig,
) -> Result<ConversionResult, ConversionError> {
    let media_url = media_url.as_ref();
    info!("Resolving audio stream for: {}", media_url);

    let mut events = audio_stream(media_url, config);

    while let Some(event) = events.next().await {
        let event = event?;
        debug!("Progress: {}", event);

        if let Some(ref observer) = config.observer {
            match &event {
                ProgressEvent::WaitingForConversion => observer.on_waiting(),
                ProgressEvent::Downloading(p) => observer.on_downloading(*p),
                ProgressEvent::Converting(p) => observer.on_converting(*p),
                ProgressEvent::Success(result) => observer.on_finished(result),
            }
        }

        if let ProgressEvent::Success(result) = event {
            info!("Conversion finished: '{}'", result.title);
            return Ok(result);
        }
    }

    // The poller terminates with Success or an error; completing without
    // either would violate its contract.
    Err(ConversionError::Internal(
        "progress stream ended without a terminal event".into(),
    ))
}
