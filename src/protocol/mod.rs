//! Protocol stages for driving the conversion cloud.
//!
//! Each submodule implements exactly one stage of the conversion-tracking
//! protocol. Keeping stages separate makes each independently testable and
//! keeps the decoding rules out of the network code.
//!
//! ## Data Flow
//!
//! ```text
//! submit ──▶ jsonp ──▶ payload ──▶ poll ──▶ jsonp ──▶ payload ──▶ events
//! (POST)    (eval)    (statusurl)  (GET,     (eval)    (step)      ⟳ every
//!                                  ×N)                             3 s
//! ```
//!
//! 1. [`submit`]  — one POST announcing the media URL; yields the opaque
//!    status handle for the job the service created
//! 2. [`jsonp`]   — evaluate a script-wrapped response body into a
//!    structured value; the payload is data, not logic, so this is a
//!    wrapper-stripping parse rather than a script engine
//! 3. [`payload`] — map loosely-typed decoded values into typed submit and
//!    status structures up front, so the poller never touches raw JSON
//! 4. [`poll`]    — the self-rescheduling status loop; the only stage with
//!    state, and the one that enforces the exactly-once termination contract

pub(crate) mod jsonp;
pub(crate) mod payload;
pub(crate) mod poll;
pub(crate) mod submit;
