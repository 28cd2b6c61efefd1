//! Client configuration.

use std::time::Duration;

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL that relative API paths are resolved against.
    pub base_url: String,
    /// Outbound request quota.
    pub rate_limit: RateLimitConfig,
    /// Streaming upload tuning.
    pub upload: UploadConfig,
    /// Deadline for a whole request, response body included. Streamed
    /// uploads use [`UploadConfig::timeout`] instead.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Pool idle timeout.
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// User-Agent header value.
    pub user_agent: String,
    /// Whether to enable request/response tracing.
    pub enable_tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::DEFAULT_BASE_URL.to_string(),
            rate_limit: RateLimitConfig::default(),
            upload: UploadConfig::default(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 10,
            user_agent: crate::USER_AGENT.to_string(),
            enable_tracing: true,
        }
    }
}

impl ClientConfig {
    /// Create a new client config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for ClientConfig.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL (e.g. a mock server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the rate limit configuration.
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.config.rate_limit = rate_limit;
        self
    }

    /// Set the upload configuration.
    pub fn with_upload(mut self, upload: UploadConfig) -> Self {
        self.config.upload = upload;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set pool idle timeout.
    pub fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    pub fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Set custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable request/response tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.config.enable_tracing = enabled;
        self
    }

    /// Build the client configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Token bucket parameters for the outbound request quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum burst size.
    pub capacity: u64,
    /// Time to regenerate one token. Zero disables limiting.
    pub refill_interval: Duration,
}

impl Default for RateLimitConfig {
    /// 100 requests per 15 seconds.
    fn default() -> Self {
        Self {
            capacity: 100,
            refill_interval: Duration::from_millis(150),
        }
    }
}

impl RateLimitConfig {
    /// Create a bucket of `capacity` tokens refilled one per `refill_interval`.
    pub fn new(capacity: u64, refill_interval: Duration) -> Self {
        Self {
            capacity,
            refill_interval,
        }
    }

    /// No limiting at all.
    pub fn unlimited() -> Self {
        Self {
            capacity: u64::MAX,
            refill_interval: Duration::ZERO,
        }
    }
}

/// Tuning for the streaming multipart upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadConfig {
    /// Largest chunk read from the attachment source at once.
    pub chunk_size: usize,
    /// Number of chunks the conduit holds before the encoder blocks.
    pub conduit_capacity: usize,
    /// Deadline for a whole upload. `None` lets an upload run as long as
    /// the attachment takes to read; the connect timeout still applies.
    pub timeout: Option<Duration>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64 * 1024,
            conduit_capacity: 4,
            timeout: None,
        }
    }
}
