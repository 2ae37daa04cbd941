//! Script-value evaluator for JSONP response bodies.
//!
//! The conversion cloud answers with a script-wrapped payload — a function
//! call wrapping a data literal, e.g. `jsonp({"statusurl": "…"});` — rather
//! than plain JSON. The wrapped value is pure data, so a full script engine
//! is unnecessary: stripping the call wrapper and parsing the interior as
//! JSON yields the same structured value evaluation would.
//!
//! Returns `None` when no data value can be extracted at all; callers map
//! that to [`crate::error::ConversionError::ScriptEvaluation`]. A payload
//! that *does* evaluate but to the wrong shape (`null`, a bare string, an
//! object missing fields) is the caller's concern — shape checks live in
//! [`super::payload`].

use serde_json::Value;

/// Evaluate a response body into a structured value.
///
/// Accepts both a script-wrapped payload (`callback({…})`, with or without
/// a trailing semicolon) and a bare JSON document, which the service has
/// been observed to return on some endpoints. The wrapper is identified by
/// the first `(` and the last `)` — the argument itself may contain
/// parentheses inside string values, so matching the outermost pair is the
/// only safe interpretation.
pub(crate) fn evaluate(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Bare JSON first: cheaper, and a JSON document never parses as a call.
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let open = trimmed.find('(')?;
    let close = trimmed.rfind(')')?;
    if close <= open {
        return None;
    }

    let inner = trimmed[open + 1..close].trim();
    if inner.is_empty() {
        return None;
    }

    serde_json::from_str(inner).ok()
}
