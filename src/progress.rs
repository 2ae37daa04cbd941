//! Progress-observer trait for conversion status events.
//!
//! Inject an [`Arc<dyn ProgressObserver>`] via
//! [`crate::config::ClientConfigBuilder::observer`] to receive status
//! callbacks while [`crate::resolve`] drives a conversion to completion.
//!
//! # Why callbacks next to the stream API?
//!
//! [`crate::audio_stream`] already exposes every event as a `Stream`, which
//! is the right surface for async consumers. The observer exists for the
//! eager path: callers of [`crate::resolve`] want a single awaited result
//! but still need to forward progress to a progress bar, a UI label, or a
//! log — without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` so one observer can serve
//! several concurrent conversions.

use crate::output::ConversionResult;
use std::sync::Arc;

/// Called by [`crate::resolve`] as conversion progress events arrive.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Calls for one conversion arrive strictly in event
/// order; distinct conversions sharing one observer may interleave.
pub trait ProgressObserver: Send + Sync {
    /// The job is queued and the service has not started it yet.
    fn on_waiting(&self) {}

    /// The service reported source-download progress.
    fn on_downloading(&self, percent: u8) {
        let _ = percent;
    }

    /// The service reported transcoding progress.
    fn on_converting(&self, percent: u8) {
        let _ = percent;
    }

    /// The conversion finished. Called at most once, last.
    fn on_finished(&self, result: &ConversionResult) {
        let _ = result;
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no observer is configured.
pub struct NoopProgressObserver;

impl ProgressObserver for NoopProgressObserver {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type SharedObserver = Arc<dyn ProgressObserver>;
