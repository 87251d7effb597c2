//! Configuration for the TycoonKV client
//!
//! Centralized configuration with sensible defaults.

/// Default per-call deadline in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Default number of pooled connections kept to the server
pub const DEFAULT_POOL_SIZE: usize = 4;

/// Main configuration for a client connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Server hostname or IP address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// Max idle connections kept in the pool for the server host
    pub pool_size: usize,

    /// Per-call deadline (milliseconds). Covers connect, request and
    /// response body read of a single attempt.
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 1978,
            pool_size: DEFAULT_POOL_SIZE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server hostname or IP address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server TCP port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the number of pooled connections
    pub fn pool_size(mut self, size: usize) -> Self {
        self.config.pool_size = size;
        self
    }

    /// Set the per-call deadline (in milliseconds)
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
