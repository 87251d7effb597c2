//! Error types for the TycoonKV client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using TycoonError
pub type Result<T> = std::result::Result<T, TycoonError>;

/// Unified error type for TycoonKV client operations
#[derive(Debug, Error)]
pub enum TycoonError {
    // -------------------------------------------------------------------------
    // Call Outcome Errors
    // -------------------------------------------------------------------------
    /// The per-call deadline elapsed before the response completed.
    #[error("operation timed out")]
    Timeout,

    /// The store has no entry for the key. The wording matches the server's
    /// own "logical inconsistency" phrasing so that existing log searches for
    /// that string keep finding lookup misses.
    #[error("entry not found aka logical inconsistency")]
    NotFound,

    /// Zero records matched a prefix query. The old gokabinet library
    /// reported this case as an error named "success"; kept for
    /// compatibility with callers that match on it.
    #[error("success")]
    Success,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// The response carried a content type whose encoding suffix is not one
    /// of `s` (identity), `B` (base64) or `U` (URL-percent).
    #[error("server responded with unknown content type: {0}")]
    UnknownContentType(String),

    /// A base64-encoded field in the response did not decode.
    #[error("invalid base64 field: {0}")]
    Base64(#[from] base64::DecodeError),

    /// A structured response field (such as `count` or `num`) was missing
    /// or not parseable.
    #[error("malformed response field: {0}")]
    BadField(String),

    // -------------------------------------------------------------------------
    // Remote Errors
    // -------------------------------------------------------------------------
    /// The server reported an error, either as an `ERROR` record in an RPC
    /// response or as a non-success REST status with a message body.
    #[error("server error: {0}")]
    Remote(String),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Connection or HTTP-level failure that survived the single retry.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
