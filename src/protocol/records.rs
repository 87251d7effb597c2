//! Record and encoding definitions
//!
//! Represents the key/value records exchanged with the server and the
//! field encodings applied to them on the wire.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Result, TycoonError};

/// One key/value record on the wire.
///
/// An explicit pair of byte vectors rather than a map entry because record
/// order matters when building requests, and both fields may contain
/// arbitrary bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record key
    pub key: Vec<u8>,

    /// Record value
    pub value: Vec<u8>,
}

impl Record {
    /// Create a record from anything convertible to byte vectors
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Field encoding applied to an outgoing request batch.
///
/// The decision is whole-batch: a single binary byte anywhere in any key or
/// value switches every field of the request to base64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEncoding {
    /// All bytes printable ASCII, transmitted verbatim
    Identity,

    /// Every key and value base64-encoded (standard alphabet)
    Base64,
}

impl FieldEncoding {
    /// The request `Content-Type` header value announcing this encoding
    pub fn content_type(&self) -> &'static str {
        match self {
            FieldEncoding::Identity => "text/tab-separated-values",
            FieldEncoding::Base64 => "text/tab-separated-values; colenc=B",
        }
    }
}

/// Field encoding of an incoming response, chosen by the server.
///
/// Derived once from the response content type and then matched
/// exhaustively, so an unrecognized encoding is a checked error path rather
/// than a silent fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnEncoding {
    /// Plain TSV, fields verbatim
    Identity,

    /// Fields base64-encoded (`colenc=B`)
    Base64,

    /// Fields URL-percent-encoded (`colenc=U`)
    Url,
}

impl ColumnEncoding {
    /// Select the decoder from a response content type.
    ///
    /// The server always puts the `colenc` parameter at the end of the
    /// header, so the last character is enough to tell the three formats
    /// apart: `B` and `U` from `colenc=B`/`colenc=U`, and `s` from the bare
    /// `text/tab-separated-values`. Parsing the full mime type would buy
    /// nothing here.
    pub fn from_content_type(content_type: &str) -> Result<Self> {
        match content_type.as_bytes().last() {
            Some(b'B') => Ok(ColumnEncoding::Base64),
            Some(b'U') => Ok(ColumnEncoding::Url),
            Some(b's') => Ok(ColumnEncoding::Identity),
            _ => Err(TycoonError::UnknownContentType(content_type.to_string())),
        }
    }

    /// Decode a single field into a new owned buffer.
    pub fn decode(&self, field: &[u8]) -> Result<Vec<u8>> {
        match self {
            ColumnEncoding::Identity => Ok(field.to_vec()),
            ColumnEncoding::Base64 => Ok(STANDARD.decode(field)?),
            ColumnEncoding::Url => Ok(url_decode(field)),
        }
    }
}

/// Decode %-escaped URL format.
///
/// Deliberately lenient: a non-hex character after `%` contributes nibble
/// value 0 instead of failing, and a truncated escape at end of input reads
/// the missing characters as 0. Servers in the wild emit well-formed
/// escapes; the lenient path exists for compatibility with the historical
/// client behavior.
fn url_decode(field: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(field.len());
    let mut i = 0;
    while i < field.len() {
        if field[i] != b'%' {
            out.push(field[i]);
            i += 1;
            continue;
        }
        let hi = field.get(i + 1).copied().map_or(0, unhex);
        let lo = field.get(i + 2).copied().map_or(0, unhex);
        out.push(hi << 4 | lo);
        i += 3;
    }
    out
}

/// Hex digit to nibble; non-hex input maps to 0 (see `url_decode`)
fn unhex(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}
