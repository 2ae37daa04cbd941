//! Typed decoding of evaluated service payloads.
//!
//! The evaluator hands back loosely-typed [`serde_json::Value`]s; everything
//! downstream works with the types in this module instead. Mapping into a
//! tagged [`StatusStep`] up front concentrates every field access and parse
//! in one place, so the poller is a pure state machine over typed input.
//!
//! Decoding distinguishes three outcomes:
//! * a typed value — the payload matched a known shape;
//! * a tolerated gap (`Ok(None)` step, `percent: None`) — the service sent a
//!   transitional payload, the cycle becomes a no-op;
//! * [`ConversionError::MalformedResponse`] — the payload is structurally
//!   unusable (empty result, required field missing on a terminal step).

use crate::error::ConversionError;
use serde_json::Value;
use url::Url;

/// Opaque handle identifying one server-side conversion job.
///
/// Produced by [`super::submit`], consumed by [`super::poll`]. Valid for the
/// lifetime of one conversion and not reusable across requests; expiry is
/// the service's business.
#[derive(Debug, Clone)]
pub(crate) struct StatusHandle(Url);

impl StatusHandle {
    pub(crate) fn as_url(&self) -> &Url {
        &self.0
    }

    /// Polling URL with the service's structured-output marker appended.
    ///
    /// The status URL already carries a query string, so the marker is raw
    /// `&json` concatenation — exactly what the service expects.
    pub(crate) fn poll_url(&self) -> String {
        format!("{}&json", self.0)
    }
}

/// Decode a submit response into a [`StatusHandle`].
pub(crate) fn decode_submit(value: &Value) -> Result<StatusHandle, ConversionError> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed("submit", "evaluated to an empty or non-object result"))?;

    let status_url = object
        .get("statusurl")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("submit", "missing 'statusurl' string field"))?;

    let url = Url::parse(status_url)
        .map_err(|e| malformed("submit", format!("'statusurl' is not a valid URL: {e}")))?;

    Ok(StatusHandle(url))
}

/// One decoded status payload, keyed by the service's step discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StatusStep {
    /// Job is queued behind a ticket.
    Ticket,
    /// Transcoding in progress. `None` percent means the service sent a
    /// value that does not parse as 0–255; the cycle is skipped.
    Convert { percent: Option<u8> },
    /// Source download in progress; percent semantics as for `Convert`.
    Download { percent: Option<u8> },
    /// Conversion finished; carries the final filename and download URL.
    Finished {
        filename: String,
        download_url: String,
    },
    /// A step name this client does not know. Kept as data so the poller
    /// can log it and move on.
    Unknown { step: String },
}

/// Decode a status payload into a step, or `Ok(None)` for transitional
/// payloads with no status block.
///
/// The step discriminator lives at `status.@attributes.step`; the finished
/// step's `file` and `downloadurl` fields live at the payload's top level.
pub(crate) fn decode_status(value: &Value) -> Result<Option<StatusStep>, ConversionError> {
    let object = value
        .as_object()
        .ok_or_else(|| malformed("status", "evaluated to an empty or non-object result"))?;

    let attributes = match object.get("status").and_then(|s| s.get("@attributes")) {
        Some(attrs) => attrs,
        None => return Ok(None),
    };

    let step = match attributes.get("step").and_then(Value::as_str) {
        Some(step) => step,
        None => return Ok(None),
    };

    let decoded = match step {
        "ticket" => StatusStep::Ticket,
        "convert" => StatusStep::Convert {
            percent: decode_percent(attributes),
        },
        "download" => StatusStep::Download {
            percent: decode_percent(attributes),
        },
        "finished" => {
            let filename = object
                .get("file")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed("status", "finished step missing 'file' field"))?;
            let download_url = object
                .get("downloadurl")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed("status", "finished step missing 'downloadurl' field"))?;
            StatusStep::Finished {
                filename: filename.to_string(),
                download_url: download_url.to_string(),
            }
        }
        other => StatusStep::Unknown {
            step: other.to_string(),
        },
    };

    Ok(Some(decoded))
}

/// Percent arrives as a string-encoded integer. Anything that does not
/// parse — missing field, non-string, non-numeric text — becomes `None`.
fn decode_percent(attributes: &Value) -> Option<u8> {
    attributes
        .get("percent")
        .and_then(Value::as_str)
        .and_then(|p| p.trim().parse().ok())
}

fn malformed(context: &'static str, detail: impl Into<String>) -> ConversionError {
    ConversionError::MalformedResponse {
        context,
        detail: detail.into(),
    }
}
