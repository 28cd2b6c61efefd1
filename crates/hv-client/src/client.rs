//! Rate-limited, authenticated HTTP client for the Harvest API.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Request bodies and credentials are skipped in tracing spans

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::Result;
use crate::rate_limit::RateLimiter;
use crate::request::{HttpRequest, RequestMethod};
use crate::response::HttpResponse;
use crate::transport::{ReqwestTransport, Transport};

/// HTTP client every Harvest request goes through.
///
/// Cloning is cheap and clones share the same transport and the same
/// [`RateLimiter`], so the request quota holds across every clone and
/// every concurrent caller.
///
/// # Example
///
/// ```rust,ignore
/// use harvest_client::{ClientConfig, Credentials, HarvestHttpClient};
///
/// let client = HarvestHttpClient::new(Credentials::from_env()?, ClientConfig::default())?;
/// let company: serde_json::Value = client.get_json(&client.url("company")).await?;
/// ```
#[derive(Clone)]
pub struct HarvestHttpClient {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    credentials: Credentials,
    config: Arc<ClientConfig>,
}

impl std::fmt::Debug for HarvestHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarvestHttpClient")
            .field("base_url", &self.config.base_url)
            .field("credentials", &self.credentials)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl HarvestHttpClient {
    /// Create a client using the reqwest transport.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(credentials, config, transport))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(
        credentials: Credentials,
        config: ClientConfig,
        transport: impl Transport + 'static,
    ) -> Self {
        let limiter = Arc::new(RateLimiter::from_config(&config.rate_limit));
        Self {
            transport: Arc::new(transport),
            limiter,
            credentials,
            config: Arc::new(config),
        }
    }

    /// Replace the rate limiter, e.g. to share one quota between clients.
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Get the shared rate limiter.
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Build the full URL for a path.
    ///
    /// Absolute URLs are returned unchanged; anything else is appended to
    /// the configured base URL.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.config.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }

    /// Create an authenticated request.
    pub fn request(&self, method: RequestMethod, url: impl Into<String>) -> HttpRequest {
        self.credentials
            .headers()
            .into_iter()
            .fold(HttpRequest::new(method, url), |req, (name, value)| {
                req.header(name, value)
            })
    }

    /// Create an authenticated GET request.
    pub fn get(&self, url: impl Into<String>) -> HttpRequest {
        self.request(RequestMethod::Get, url)
    }

    /// Create an authenticated POST request.
    pub fn post(&self, url: impl Into<String>) -> HttpRequest {
        self.request(RequestMethod::Post, url)
    }

    /// Send a request after taking one token from the rate limiter.
    ///
    /// Every outbound call of this crate ends up here.
    #[instrument(skip(self, request), fields(method = request.method.as_str(), url = %request.url))]
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.limiter.acquire(1).await;

        if self.config.enable_tracing {
            debug!("Sending request");
        }

        let response = self.transport.send(request).await?;

        if self.config.enable_tracing {
            let status = response.status();
            if response.is_success() {
                debug!(status, "Response received");
            } else {
                warn!(status, "Non-success response");
            }
        }

        Ok(response)
    }

    /// Send a request and fail with a remote error unless the status matches.
    pub async fn execute_expecting(
        &self,
        request: HttpRequest,
        expected_status: u16,
    ) -> Result<HttpResponse> {
        self.execute(request).await?.expect_status(expected_status).await
    }

    /// GET request with JSON response deserialization.
    #[instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.execute_expecting(self.get(url), 200).await?;
        response.json().await
    }

    /// POST request with JSON body, expecting the given status.
    #[instrument(skip(self, body))]
    pub async fn post_json<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        expected_status: u16,
    ) -> Result<HttpResponse> {
        let request = self.post(url).json(body)?;
        self.execute_expecting(request, expected_status).await
    }
}
