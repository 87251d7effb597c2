//! Client Module
//!
//! The public connection type that coordinates the codec and transport.
//!
//! ## Responsibilities
//! - Route each operation to the REST or RPC interface
//! - Translate HTTP statuses and error records into typed errors
//! - Apply the bulk-operation key convention (`_` prefix on the wire)
//!
//! The server exposes two interfaces. The RESTful one (path = key,
//! body = value) is the fast path but covers only single-key get/set/remove.
//! Everything else tunnels through the RPC interface as TSV records. Each
//! public operation below uses the REST interface when it can and falls
//! back to RPC when it must.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use reqwest::{Method, StatusCode};

use crate::config::Config;
use crate::error::{Result, TycoonError};
use crate::protocol::{decode_records, encode_records, encode_rest_path, Record};
use crate::transport::Transport;

/// Value transmitted for keys in bulk requests that carry no payload
const PLACEHOLDER_VALUE: &[u8] = b"0";

/// A connection to one key-value server endpoint.
///
/// Holds a bounded pool of persistent HTTP connections and is safe for
/// concurrent use from many threads without external locking. Every call
/// blocks the invoking thread until the response arrives, the deadline
/// fires, or the single retry completes.
pub struct Conn {
    transport: Transport,
}

impl Conn {
    /// Connect to `host:port` with default pool size and timeout.
    ///
    /// Performs a zero-argument RPC probe so an unreachable server fails
    /// construction instead of the first real operation.
    pub fn connect(host: impl Into<String>, port: u16) -> Result<Self> {
        let config = Config::builder().host(host).port(port).build();
        Self::with_config(config)
    }

    /// Connect with a custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let transport = Transport::new(
            &config.host,
            config.port,
            config.pool_size,
            Duration::from_millis(config.timeout_ms),
        )?;
        let conn = Self { transport };
        conn.do_rpc("/rpc/void", &[])?;
        tracing::debug!(host = %config.host, port = config.port, "connected");
        Ok(conn)
    }

    /// Number of retries performed because the remote end closed idle
    /// connections. Increases monotonically until it wraps to 0.
    pub fn retry_count(&self) -> u64 {
        self.transport.retry_count()
    }

    // -------------------------------------------------------------------------
    // Single-Key Operations (REST interface)
    // -------------------------------------------------------------------------

    /// Retrieve the value stored at `key`.
    ///
    /// Returns [`TycoonError::NotFound`] when no such entry exists.
    pub fn get(&self, key: &str) -> Result<Bytes> {
        let (status, body) = self.do_rest(Method::GET, key, &[])?;
        match status {
            StatusCode::OK => Ok(body),
            StatusCode::NOT_FOUND => Err(TycoonError::NotFound),
            _ => Err(remote_body_error(&body)),
        }
    }

    /// Store `value` at `key`
    pub fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let (status, body) = self.do_rest(Method::PUT, key, value)?;
        if status != StatusCode::CREATED {
            return Err(remote_body_error(&body));
        }
        Ok(())
    }

    /// Delete the entry at `key`.
    ///
    /// Returns [`TycoonError::NotFound`] when no such entry exists.
    pub fn remove(&self, key: &str) -> Result<()> {
        let (status, body) = self.do_rest(Method::DELETE, key, &[])?;
        match status {
            StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(TycoonError::NotFound),
            _ => Err(remote_body_error(&body)),
        }
    }

    // -------------------------------------------------------------------------
    // Store-Wide Operations (RPC interface)
    // -------------------------------------------------------------------------

    /// Number of records in the store
    pub fn count(&self) -> Result<u64> {
        let (status, records) = self.do_rpc("/rpc/status", &[])?;
        if status != StatusCode::OK {
            return Err(remote_record_error(&records));
        }
        parse_numeric_field(&records, "count")
    }

    /// Retrieve many keys in one round trip.
    ///
    /// Keys absent from the store are absent from the result map; a key
    /// stored with an empty value comes back present and empty. The two
    /// cases are told apart by seeding every requested key with a
    /// placeholder that only a decoded record can replace.
    pub fn get_bulk(&self, keys: &[String]) -> Result<HashMap<String, Vec<u8>>> {
        let request: Vec<Record> = keys
            .iter()
            .map(|k| Record::new(format!("_{}", k), PLACEHOLDER_VALUE))
            .collect();
        let (status, records) = self.do_rpc("/rpc/get_bulk", &request)?;
        if status != StatusCode::OK {
            return Err(remote_record_error(&records));
        }

        let mut found: HashMap<String, Option<Vec<u8>>> =
            keys.iter().map(|k| (k.clone(), None)).collect();
        for rec in records {
            let Some(key) = rec.key.strip_prefix(b"_") else {
                // Records without the sentinel prefix are server metadata.
                continue;
            };
            let key = String::from_utf8_lossy(key).into_owned();
            found.insert(key, Some(rec.value));
        }
        Ok(found
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect())
    }

    /// Store many key/value pairs in one round trip, returning the number
    /// of records the server reports as stored
    pub fn set_bulk(&self, entries: &HashMap<String, Vec<u8>>) -> Result<u64> {
        let request: Vec<Record> = entries
            .iter()
            .map(|(k, v)| Record::new(format!("_{}", k), v.clone()))
            .collect();
        let (status, records) = self.do_rpc("/rpc/set_bulk", &request)?;
        if status != StatusCode::OK {
            return Err(remote_record_error(&records));
        }
        parse_numeric_field(&records, "num")
    }

    /// Delete many keys in one round trip, returning the number of records
    /// the server reports as removed
    pub fn remove_bulk(&self, keys: &[String]) -> Result<u64> {
        let request: Vec<Record> = keys
            .iter()
            .map(|k| Record::new(format!("_{}", k), PLACEHOLDER_VALUE))
            .collect();
        let (status, records) = self.do_rpc("/rpc/remove_bulk", &request)?;
        if status != StatusCode::OK {
            return Err(remote_record_error(&records));
        }
        parse_numeric_field(&records, "num")
    }

    /// List up to `max` keys starting with `prefix`, sorted by the server
    /// (`max` of -1 means no limit).
    ///
    /// Returns [`TycoonError::Success`] when nothing matched: the old
    /// gokabinet library reported the empty case as an error and callers
    /// still depend on that.
    pub fn match_prefix(&self, prefix: &str, max: i64) -> Result<Vec<String>> {
        let request = [
            Record::new("prefix", prefix),
            Record::new("max", max.to_string()),
        ];
        let (status, records) = self.do_rpc("/rpc/match_prefix", &request)?;
        if status != StatusCode::OK {
            return Err(remote_record_error(&records));
        }

        let matched: Vec<String> = records
            .iter()
            .filter_map(|rec| rec.key.strip_prefix(b"_"))
            .map(|key| String::from_utf8_lossy(key).into_owned())
            .collect();
        if matched.is_empty() {
            return Err(TycoonError::Success);
        }
        Ok(matched)
    }

    // -------------------------------------------------------------------------
    // Protocol Dispatch
    // -------------------------------------------------------------------------

    /// Execute one RPC call: encode the records, POST them, decode the
    /// response with its declared content type
    fn do_rpc(&self, path: &str, records: &[Record]) -> Result<(StatusCode, Vec<Record>)> {
        let (body, encoding) = encode_records(records);
        let response =
            self.transport
                .round_trip(Method::POST, path, Some(encoding.content_type()), &body)?;
        let records = decode_records(&response.body, &response.content_type)?;
        Ok((response.status, records))
    }

    /// Execute one REST call against the key's escaped path
    fn do_rest(&self, method: Method, key: &str, body: &[u8]) -> Result<(StatusCode, Bytes)> {
        let path = encode_rest_path(key);
        let response = self.transport.round_trip(method, &path, None, body)?;
        Ok((response.status, response.body))
    }
}

// =============================================================================
// Response Interpretation Helpers
// =============================================================================

/// Error for a non-success REST status, carrying the response body as text
fn remote_body_error(body: &[u8]) -> TycoonError {
    TycoonError::Remote(String::from_utf8_lossy(body).into_owned())
}

/// Error for a non-success RPC status, carrying the `ERROR` record's value
/// when the server supplied one
fn remote_record_error(records: &[Record]) -> TycoonError {
    match find_record(records, b"ERROR") {
        Some(rec) => TycoonError::Remote(String::from_utf8_lossy(&rec.value).into_owned()),
        None => TycoonError::Remote("unspecified error".to_string()),
    }
}

/// First record with the given key, if any
fn find_record<'a>(records: &'a [Record], key: &[u8]) -> Option<&'a Record> {
    records.iter().find(|rec| rec.key == key)
}

/// Parse a decimal numeric field out of a response record
fn parse_numeric_field(records: &[Record], name: &str) -> Result<u64> {
    let rec = find_record(records, name.as_bytes())
        .ok_or_else(|| TycoonError::BadField(format!("missing {} record", name)))?;
    std::str::from_utf8(&rec.value)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            TycoonError::BadField(format!(
                "{} is not a number: {:?}",
                name,
                String::from_utf8_lossy(&rec.value)
            ))
        })
}
