//! TSV codec
//!
//! Encoding and decoding functions for the tab-separated-value wire format.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬──────┬─────────────┬──────┐
//! │   key    │ \t   │    value    │ \n   │   (repeated per record)
//! └──────────┴──────┴─────────────┴──────┘
//! ```
//!
//! Requests use identity or base64 field encoding, decided per batch by
//! content inspection. Responses additionally allow URL-percent encoding;
//! the server signals its choice through the content type (see
//! [`ColumnEncoding`]).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{ColumnEncoding, FieldEncoding, Record};
use crate::error::Result;

/// Base64-encoded length of `n` input bytes (standard alphabet, padded)
fn base64_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

/// True when the byte cannot travel verbatim in a TSV field
fn is_binary(b: u8) -> bool {
    b < 0x20 || b > 0x7e
}

fn has_binary(field: &[u8]) -> bool {
    field.iter().copied().any(is_binary)
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a record batch into a TSV request body.
///
/// A single scan decides the encoding and sizes the output: any binary byte
/// anywhere in the batch forces base64 for every field, and the buffer is
/// sized for the base64 case up front since the decision is not known until
/// the scan completes. When identity wins, the raw bytes are shorter than
/// the reserved buffer and the written prefix is returned.
///
/// An empty batch encodes to an empty body with identity encoding.
pub fn encode_records(records: &[Record]) -> (Vec<u8>, FieldEncoding) {
    let mut bufsize = 0;
    let mut binary = false;
    for rec in records {
        binary = binary || has_binary(&rec.key) || has_binary(&rec.value);
        // key, tab, value, newline
        bufsize += base64_len(rec.key.len()) + 1 + base64_len(rec.value.len()) + 1;
    }

    let mut buf = vec![0u8; bufsize];
    let mut n = 0;
    for rec in records {
        n += encode_field(&rec.key, binary, &mut buf[n..]);
        buf[n] = b'\t';
        n += 1;
        n += encode_field(&rec.value, binary, &mut buf[n..]);
        buf[n] = b'\n';
        n += 1;
    }
    buf.truncate(n);

    let encoding = if binary {
        FieldEncoding::Base64
    } else {
        FieldEncoding::Identity
    };
    (buf, encoding)
}

/// Write one field into `out`, returning the number of bytes written
fn encode_field(field: &[u8], base64: bool, out: &mut [u8]) -> usize {
    if base64 {
        // out is sized for the base64 expansion of the whole batch, so the
        // encoder cannot run out of room here.
        STANDARD
            .encode_slice(field, out)
            .expect("output buffer sized for base64 expansion")
    } else {
        out[..field.len()].copy_from_slice(field);
        field.len()
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a TSV response body into records.
///
/// The decoder is selected from the response content type. An empty body is
/// an empty record list, not an error, and is returned before the content
/// type is inspected (a bodyless response may not carry one at all).
///
/// The parse loop reads up-to-TAB as the key and up-to-LF as the value.
/// Absence of a separator is normal end of stream, not a malformed payload:
/// a remainder without a TAB yields no further records, and a final value
/// segment without a trailing LF is consumed whole. A record is emitted
/// only when a value segment (including its LF, when present) is non-empty.
pub fn decode_records(body: &[u8], content_type: &str) -> Result<Vec<Record>> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let encoding = ColumnEncoding::from_content_type(content_type)?;

    // The newline count is an upper bound on the record count, so the
    // output never reallocates while parsing.
    let count = body.iter().filter(|&&b| b == b'\n').count();
    let mut records = Vec::with_capacity(count);

    let mut rest = body;
    loop {
        let Some(tab) = rest.iter().position(|&b| b == b'\t') else {
            return Ok(records);
        };
        let key = encoding.decode(&rest[..tab])?;
        rest = &rest[tab + 1..];

        match rest.iter().position(|&b| b == b'\n') {
            Some(newline) => {
                let value = encoding.decode(&rest[..newline])?;
                records.push(Record { key, value });
                rest = &rest[newline + 1..];
            }
            None => {
                // Stream ended mid-record: the whole remainder is the value.
                if !rest.is_empty() {
                    let value = encoding.decode(rest)?;
                    records.push(Record { key, value });
                }
                return Ok(records);
            }
        }
    }
}

// =============================================================================
// REST path encoding
// =============================================================================

const UPPERHEX: &[u8; 16] = b"0123456789ABCDEF";

/// Escape a key into a REST request path with a leading `/`.
///
/// Matches query-component escaping byte-for-byte as the server expects it:
/// unreserved characters (`A-Z a-z 0-9 - _ . ~`) pass through, space becomes
/// `+`, everything else becomes `%XX` with uppercase hex. The `+`-for-space
/// convention rules out the stock percent-encoder crates, which always emit
/// `%20`.
pub fn encode_rest_path(key: &str) -> String {
    let mut path = String::with_capacity(key.len() + 1);
    path.push('/');
    for &b in key.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                path.push(b as char);
            }
            b' ' => path.push('+'),
            _ => {
                path.push('%');
                path.push(UPPERHEX[(b >> 4) as usize] as char);
                path.push(UPPERHEX[(b & 0x0f) as usize] as char);
            }
        }
    }
    path
}
