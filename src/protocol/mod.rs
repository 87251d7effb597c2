//! Protocol Module
//!
//! Defines the TSV wire format tunneled over the server's RPC interface.
//!
//! ## Request Format
//! ```text
//! ┌──────────┬──────┬─────────────┬──────┐
//! │   key    │ \t   │    value    │ \n   │   (repeated per record)
//! └──────────┴──────┴─────────────┴──────┘
//! ```
//!
//! Every field of a request is encoded uniformly: identity when all bytes
//! are printable ASCII, base64 otherwise. The choice is signaled in the
//! request content type:
//! - identity: `text/tab-separated-values`
//! - base64:   `text/tab-separated-values; colenc=B`
//!
//! ## Response Format
//! Same record layout. The server picks one of three field encodings and
//! signals it through the last character of the response content type:
//! - `s` → identity (terminal character of "tab-separated-values")
//! - `B` → base64 (`colenc=B`)
//! - `U` → URL-percent (`colenc=U`)
//!
//! Any other trailing character is a protocol error.

mod codec;
mod records;

pub use codec::{decode_records, encode_records, encode_rest_path};
pub use records::{ColumnEncoding, FieldEncoding, Record};
