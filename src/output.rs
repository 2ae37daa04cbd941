//! Public result and progress-event types.
//!
//! A conversion session is observed as an ordered stream of
//! [`ProgressEvent`]s. The stream contract is strict: at most one
//! [`ProgressEvent::Success`] is ever emitted, it is always the last event,
//! and nothing follows it. Percent values are relayed exactly as the service
//! reports them — the service may repeat or skip values, so consumers must
//! not assume monotonicity.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// The final outcome of a successful conversion.
///
/// Owned by the caller once emitted; the crate retains nothing. Fetching the
/// actual audio bytes from `stream_url` is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Direct URL of the converted audio stream.
    pub stream_url: Url,
    /// Track title, derived from the server-reported filename with its
    /// 4-character extension suffix removed.
    pub title: String,
}

/// One observation of a conversion job's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressEvent {
    /// The job is queued; the service has not started working on it yet.
    WaitingForConversion,
    /// The service is fetching the source media. Percent is 0–100 as
    /// reported by the service.
    Downloading(u8),
    /// The service is transcoding the media to audio. Percent is 0–100 as
    /// reported by the service.
    Converting(u8),
    /// The conversion finished; this is always the final event.
    Success(ConversionResult),
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::WaitingForConversion => write!(f, "waiting for conversion"),
            ProgressEvent::Downloading(p) => write!(f, "downloading {p}%"),
            ProgressEvent::Converting(p) => write!(f, "converting {p}%"),
            ProgressEvent::Success(r) => write!(f, "finished: {}", r.title),
        }
    }
}

/// Derive a track title from the server-reported filename.
///
/// The service always appends a 4-character extension (".mp3", ".m4a", …),
/// so the title is the filename minus its last 4 characters — counted in
/// characters, not bytes, since filenames routinely carry non-ASCII track
/// names. A filename shorter than 4 characters yields an empty title rather
/// than a panic.
pub(crate) fn derive_title(filename: &str) -> String {
    let keep = filename.chars().count().saturating_sub(4);
    filename.chars().take(keep).collect()
}
