//! The "send one request, get one response" capability.
//!
//! The client core never talks to the network directly. It hands fully
//! built [`HttpRequest`]s to a [`Transport`]; [`ReqwestTransport`] is the
//! production implementation and tests substitute their own.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{HttpRequest, RequestBody};
use crate::response::{HttpResponse, ResponseBody};

/// Sends a single HTTP request.
///
/// Implementations must not retry and must not rate limit; both concerns
/// belong to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the response with its body unread.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Transport backed by a pooled `reqwest::Client`.
///
/// Deadlines are set per request rather than on the pooled client: a
/// buffered request gets `ClientConfig::timeout`, a streamed body gets
/// `UploadConfig::timeout`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    timeout: Option<Duration>,
    upload_timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Build a transport from client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self {
            inner,
            timeout: Some(config.timeout),
            upload_timeout: config.upload.timeout,
        })
    }

    /// Wrap an existing reqwest client. Its own timeouts apply unchanged.
    pub fn from_client(inner: reqwest::Client) -> Self {
        Self {
            inner,
            timeout: None,
            upload_timeout: None,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut req = self.inner.request(method.to_reqwest(), url.as_str());

        for (name, value) in &headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let (req, timeout) = match body {
            RequestBody::Empty => (req, self.timeout),
            RequestBody::Bytes(bytes) => (req.body(bytes), self.timeout),
            RequestBody::Stream(stream) => (
                req.body(reqwest::Body::wrap_stream(stream)),
                self.upload_timeout,
            ),
        };
        let req = match timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        };

        let response = req.send().await?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                Some((name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .bytes_stream()
            .map_err(|e| std::io::Error::other(Error::from(e)));

        Ok(HttpResponse::new(status, headers, ResponseBody::from_stream(body)))
    }
}
