//! # TycoonKV
//!
//! A connection-pooled HTTP client for Kyoto Tycoon-compatible key-value
//! stores, with:
//! - A TSV wire codec with identity, base64 and URL-percent field encodings
//! - A bounded pool of persistent connections, safe for concurrent use
//! - A hard per-call deadline and exactly-one-retry transport policy
//! - Typed errors, including the legacy sentinels older callers depend on
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Conn (facade)                        │
//! │      get / set / remove / count / bulk / match_prefix       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  REST call  │          │  RPC call   │
//!   │ (path=key)  │          │ (TSV body)  │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          │                 ┌──────▼──────┐
//!          │                 │  TSV Codec  │
//!          │                 └──────┬──────┘
//!          └────────────┬───────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │   Transport   │
//!               │ (pool, retry, │
//!               │   deadline)   │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transport;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, TycoonError};
pub use config::Config;
pub use client::Conn;
pub use protocol::Record;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the TycoonKV client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
