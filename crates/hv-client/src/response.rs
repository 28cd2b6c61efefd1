//! HTTP response returned by a [`Transport`](crate::Transport).

use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};

/// A response with its body still on the wire.
#[derive(Debug)]
pub struct HttpResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: ResponseBody,
}

impl HttpResponse {
    /// Create a response. Header names are normalized to lowercase.
    pub fn new<I, K, V>(status: u16, headers: I, body: ResponseBody) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.into().to_lowercase(), v.into()))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Take the body.
    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    /// Collect the body into memory.
    pub async fn bytes(self) -> Result<Bytes> {
        self.body.bytes().await
    }

    /// Collect the body as UTF-8 text.
    pub async fn text(self) -> Result<String> {
        self.body.text().await
    }

    /// Deserialize the body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        self.body.json().await
    }

    /// Turn an unexpected status into a `Remote` error carrying the body.
    pub async fn expect_status(self, expected: u16) -> Result<Self> {
        if self.status == expected {
            return Ok(self);
        }
        let status = self.status;
        // The body is diagnostic only; a failure reading it must not mask the status.
        let body = self.body.text_lossy().await;
        Err(Error::remote(status, body))
    }
}

/// Streaming response body.
pub struct ResponseBody {
    inner: BoxStream<'static, std::io::Result<Bytes>>,
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResponseBody")
    }
}

impl ResponseBody {
    /// An empty body.
    pub fn empty() -> Self {
        Self::from_stream(stream::empty())
    }

    /// A body that is already in memory.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::from_stream(stream::once(async move { Ok(bytes) }))
    }

    /// A body read lazily from a stream of chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: futures::Stream<Item = std::io::Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: stream.boxed(),
        }
    }

    /// The raw chunk stream, for callers that copy large bodies elsewhere.
    pub fn into_stream(self) -> BoxStream<'static, std::io::Result<Bytes>> {
        self.inner
    }

    /// Collect the body into memory.
    pub async fn bytes(self) -> Result<Bytes> {
        let collected = self
            .inner
            .try_fold(BytesMut::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .map_err(body_error)?;
        Ok(collected.freeze())
    }

    /// Collect the body as UTF-8 text.
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            Error::with_source(
                ErrorKind::Decode("response body is not valid UTF-8".to_string()),
                e,
            )
        })
    }

    /// Deserialize the body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    pub(crate) async fn text_lossy(self) -> String {
        match self.bytes().await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => String::new(),
        }
    }
}

/// A body stream failure as a client error. Transports wrap their own
/// [`Error`] in the `io::Error`, which is recovered so a timeout stays a
/// timeout.
fn body_error(err: std::io::Error) -> Error {
    if err.get_ref().is_some_and(|inner| inner.is::<Error>()) {
        if let Some(Ok(inner)) = err.into_inner().map(|inner| inner.downcast::<Error>()) {
            return *inner;
        }
        return Error::new(ErrorKind::Transport("response body failed".to_string()));
    }
    Error::with_source(ErrorKind::Transport(err.to_string()), err)
}
