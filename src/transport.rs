//! Transport Module
//!
//! Executes single HTTP requests against the server over a bounded pool of
//! persistent connections.
//!
//! ## Responsibilities
//! - Impose the per-call deadline on every attempt
//! - Retry exactly once on a failed round trip, dropping idle pooled
//!   sockets first
//! - Track retries in a wraparound-tolerant counter for observability
//!
//! ## Concurrency Model
//! Any number of threads may issue calls concurrently. The only shared
//! mutable state is the pooled client handle (swapped under an `RwLock`
//! when a retry resets the pool) and the atomic retry counter. Calls hold a
//! clone of the client handle for their whole round trip, so a pool reset
//! never cancels another call's in-flight request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use parking_lot::RwLock;
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};

use crate::error::{Result, TycoonError};

/// A fully buffered response from one transport call
#[derive(Debug)]
pub struct RawResponse {
    /// HTTP status code
    pub status: StatusCode,

    /// Declared content type, empty when the header is missing
    pub content_type: String,

    /// Response body
    pub body: Bytes,
}

/// Pooled HTTP executor for a single server endpoint
pub struct Transport {
    /// Pooled client handle. Replaced wholesale on retry so the old pool's
    /// idle sockets are dropped; in-flight calls keep their own clone.
    client: RwLock<Client>,

    /// Base URL, e.g. `http://127.0.0.1:1978`
    base_url: String,

    /// Idle connections kept per host
    pool_size: usize,

    /// Per-attempt deadline
    timeout: Duration,

    /// Retries performed because the remote end dropped a connection.
    /// Increases monotonically until it wraps to 0.
    retry_count: AtomicU64,
}

impl Transport {
    /// Create a transport for one `host:port` endpoint
    pub fn new(host: &str, port: u16, pool_size: usize, timeout: Duration) -> Result<Self> {
        let client = build_client(pool_size)?;
        Ok(Self {
            client: RwLock::new(client),
            base_url: format!("http://{}:{}", host, port),
            pool_size,
            timeout,
            retry_count: AtomicU64::new(0),
        })
    }

    /// Number of retries performed over the lifetime of this transport
    pub fn retry_count(&self) -> u64 {
        self.retry_count.load(Ordering::Relaxed)
    }

    /// Execute one request and buffer the response.
    ///
    /// The first failed round trip triggers exactly one retry: idle pooled
    /// connections are dropped, the request is rebuilt from the caller's
    /// bytes (the body must be re-suppliable across attempts) and reissued.
    /// The retry counter is incremented when the retry is initiated, not on
    /// its outcome. A second failure surfaces as [`TycoonError::Timeout`]
    /// when the deadline elapsed, otherwise as a transport error.
    pub fn round_trip(
        &self,
        method: Method,
        path: &str,
        content_type: Option<&'static str>,
        body: &[u8],
    ) -> Result<RawResponse> {
        let url = format!("{}{}", self.base_url, path);
        tracing::trace!(%method, %url, body_len = body.len(), "issuing request");

        match self.send_once(method.clone(), &url, content_type, body) {
            Ok(response) => self.finish(response),
            Err(first) => {
                // The HTTP layer wraps network errors too deeply to tell a
                // dropped idle connection from anything else, so retry
                // eagerly on any round-trip failure.
                tracing::warn!(%method, %url, error = %first, "round trip failed, retrying once");
                self.reset_pool();
                self.retry_count.fetch_add(1, Ordering::Relaxed);

                match self.send_once(method, &url, content_type, body) {
                    Ok(response) => self.finish(response),
                    Err(err) if err.is_timeout() => Err(TycoonError::Timeout),
                    Err(err) => Err(TycoonError::Transport(err)),
                }
            }
        }
    }

    /// Issue a single attempt with the configured deadline
    fn send_once(
        &self,
        method: Method,
        url: &str,
        content_type: Option<&'static str>,
        body: &[u8],
    ) -> std::result::Result<Response, reqwest::Error> {
        let client = self.client.read().clone();
        let mut request = client
            .request(method, url)
            .timeout(self.timeout)
            .body(body.to_vec());
        if let Some(ct) = content_type {
            request = request.header(CONTENT_TYPE, ct);
        }
        request.send()
    }

    /// Read the response body under the same deadline.
    ///
    /// Body reads are not retried: by the time a body is streaming, the
    /// round trip itself succeeded, and replaying the request could repeat
    /// a non-idempotent operation.
    fn finish(&self, response: Response) -> Result<RawResponse> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_owned();
        let body = response.bytes().map_err(|err| {
            if err.is_timeout() {
                TycoonError::Timeout
            } else {
                TycoonError::Transport(err)
            }
        })?;
        tracing::trace!(status = status.as_u16(), body_len = body.len(), "response received");
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }

    /// Drop idle pooled sockets by swapping in a fresh client.
    ///
    /// In-flight requests on other threads hold clones of the old handle
    /// and are unaffected; their sockets close when they finish.
    fn reset_pool(&self) {
        match build_client(self.pool_size) {
            Ok(fresh) => *self.client.write() = fresh,
            Err(err) => {
                // Keep the old pool rather than poisoning every later call.
                tracing::warn!(error = %err, "could not rebuild connection pool");
            }
        }
    }
}

/// Build the pooled HTTP client for one endpoint
fn build_client(pool_size: usize) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .pool_max_idle_per_host(pool_size)
        .no_proxy()
        .build()
}
