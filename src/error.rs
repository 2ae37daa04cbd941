//! Error types for the listube library.
//!
//! Two layers of failure exist and they are kept distinct:
//!
//! * [`TransportError`] — the HTTP layer failed (connect, timeout, non-2xx
//!   status, unreadable body). Defined in [`crate::transport`] next to the
//!   client that produces it, and wrapped here as
//!   [`ConversionError::Transport`].
//!
//! * [`ConversionError`] — the conversion protocol failed: the service sent
//!   something we could not evaluate, a response had the wrong shape, or the
//!   finished payload carried an unusable download URL.
//!
//! Per-cycle data anomalies (an unparseable `percent`, an absent status
//! block, an unrecognised step name) are deliberately *not* errors. The
//! service emits transitional payloads while a job is queued or migrating
//! between steps; those cycles contribute no progress event and polling
//! continues. Only failures that make the session unrecoverable surface
//! through this module.

use crate::transport::TransportError;
use thiserror::Error;

/// All terminal errors produced by a conversion session.
///
/// A progress stream yields at most one of these, as its final item; after
/// an error no further requests are issued and no further events are
/// emitted.
#[derive(Debug, Error)]
pub enum ConversionError {
    // ── Transport ─────────────────────────────────────────────────────────
    /// The HTTP layer failed. Surfaced immediately; the session does not
    /// retry transport failures (the service's own slow progress is the
    /// only thing tolerated, via rescheduling).
    #[error(transparent)]
    Transport(#[from] TransportError),

    // ── Protocol ──────────────────────────────────────────────────────────
    /// The response body could not be evaluated as a script-wrapped payload
    /// at all — no data value could be extracted from it.
    #[error("could not evaluate script-wrapped response from {context}")]
    ScriptEvaluation { context: &'static str },

    /// Evaluation succeeded but the decoded value has the wrong shape:
    /// empty/undefined, missing a required field, or a field of the wrong
    /// type.
    #[error("malformed {context} response: {detail}")]
    MalformedResponse {
        context: &'static str,
        detail: String,
    },

    /// The service reported the conversion finished but the download URL it
    /// returned does not parse as a URL.
    #[error("conversion finished but download URL is invalid: '{url}'")]
    InvalidResult { url: String },

    // ── Config ────────────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}
