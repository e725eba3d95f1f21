//! Error types for the idea2deck library.
//!
//! A single [`DeckError`] enum covers every fatal failure. Non-fatal
//! conditions never appear here:
//!
//! * A model reply whose *content* is not valid JSON is recovered in place
//!   with a placeholder deck (see [`crate::pipeline::parse`]). Only an
//!   unusable response envelope (no choices, body not parseable at all) is
//!   fatal.
//! * Image lookup failures are downgraded to "no image" inside
//!   [`crate::pipeline::images`] and never surface as errors.
//!
//! Configuration problems (empty idea, missing key, bad builder input) are
//! caught before any network activity. Remote-service failures abort the run
//! and are never retried automatically; the messages carry the hint a caller
//! needs to act on them.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the idea2deck library.
#[derive(Debug, Error)]
pub enum DeckError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The caller passed an empty or whitespace-only idea.
    #[error("Startup idea must not be empty.")]
    EmptyIdea,

    /// The model-service API key is missing or still a placeholder value.
    ///
    /// Raised before any network call is attempted.
    #[error("{service} API key is not configured.\nSet {env_var} or pass the key explicitly.")]
    MissingApiKey {
        service: &'static str,
        env_var: &'static str,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Remote-service errors ─────────────────────────────────────────────
    /// The service rejected the credential (HTTP 401/403).
    #[error("Authentication rejected by {service}: {detail}\nCheck the API key and try again.")]
    AuthRejected { service: String, detail: String },

    /// HTTP 429 from the service. Not retried automatically; try again later.
    ///
    /// `retry_after_secs` carries the server-specified delay when the
    /// response included a `Retry-After` header.
    #[error("Rate limit exceeded for {service}. Try again later.")]
    RateLimited {
        service: String,
        retry_after_secs: Option<u64>,
    },

    /// Any other non-success HTTP status from the service.
    #[error("{service} request failed with HTTP {status}: {detail}")]
    ServiceError {
        service: String,
        status: u16,
        detail: String,
    },

    /// The request never produced an HTTP response (DNS, TLS, timeout).
    #[error("Failed to reach {service}: {reason}")]
    Transport { service: String, reason: String },

    /// The response envelope was unusable: no choices, or a body that is not
    /// JSON at all. Distinct from unparseable assistant *content*, which
    /// falls back to a placeholder deck instead of failing.
    #[error("{service} returned an unusable reply: {detail}")]
    MalformedReply { service: String, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// printpdf failed while building or saving the document.
    #[error("Failed to render the PDF document: {detail}")]
    PdfRenderFailed { detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
