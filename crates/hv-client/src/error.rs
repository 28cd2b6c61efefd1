//! Error types for harvest-client.

/// Result type alias for harvest-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for harvest-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for a non-success response.
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        Self::new(ErrorKind::Remote {
            status,
            body: body.into(),
        })
    }

    /// Shorthand for a response with an unexpected shape.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode(message.into()))
    }

    /// Returns true if the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Transport(_) | ErrorKind::Timeout | ErrorKind::Connection(_)
        )
    }

    /// Returns true if the server answered with an unexpected status.
    pub fn is_remote(&self) -> bool {
        matches!(self.kind, ErrorKind::Remote { .. })
    }

    /// Returns true if the response body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self.kind, ErrorKind::Decode(_))
    }

    /// Returns the HTTP status if this is a remote error.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
///
/// None of these are retried inside the client. Retrying is left to the
/// caller so that a retry loop cannot silently eat into the request quota.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The request failed before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with a status other than the expected one.
    #[error("Remote error: HTTP {status}{}", if body.is_empty() { String::new() } else { format!(": {body}") })]
    Remote { status: u16, body: String },

    /// Malformed or unexpected response body.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Failure reading an upload source or writing the upload conduit.
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_decode() {
            ErrorKind::Decode(err.to_string())
        } else {
            ErrorKind::Transport(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Decode(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::new(ErrorKind::Timeout).is_transport());
        assert!(Error::new(ErrorKind::Connection("refused".into())).is_transport());
        assert!(Error::new(ErrorKind::Transport("reset".into())).is_transport());
        assert!(!Error::remote(500, "").is_transport());

        let err = Error::remote(404, "not found");
        assert!(err.is_remote());
        assert_eq!(err.status(), Some(404));

        let err = Error::decode("missing field `invoices`");
        assert!(err.is_decode());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_error_kind_display_messages() {
        let cases: Vec<(ErrorKind, &str)> = vec![
            (ErrorKind::Transport("broken pipe".into()), "Transport error: broken pipe"),
            (ErrorKind::Timeout, "Request timeout"),
            (ErrorKind::Connection("refused".into()), "Connection error: refused"),
            (
                ErrorKind::Remote {
                    status: 422,
                    body: "{\"message\":\"bad\"}".into(),
                },
                "Remote error: HTTP 422: {\"message\":\"bad\"}",
            ),
            (ErrorKind::Decode("unexpected EOF".into()), "Decode error: unexpected EOF"),
            (ErrorKind::Io("disk gone".into()), "I/O error: disk gone"),
            (ErrorKind::InvalidUrl("no scheme".into()), "Invalid URL: no scheme"),
            (ErrorKind::Config("missing token".into()), "Configuration error: missing token"),
            (ErrorKind::Other("something else".into()), "something else"),
        ];

        for (kind, expected_substring) in cases {
            let display = kind.to_string();
            assert!(
                display.contains(expected_substring),
                "Expected '{display}' to contain '{expected_substring}'"
            );
        }
    }

    #[test]
    fn test_remote_without_body() {
        assert_eq!(Error::remote(503, "").to_string(), "Remote error: HTTP 503");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<String>("not valid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.is_decode());
        assert!(err.source.is_some());
    }

    #[test]
    fn test_from_url_parse_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = url_err.into();
        assert!(matches!(err.kind, ErrorKind::InvalidUrl(_)));
    }

    #[test]
    fn test_from_io_error() {
        let err: Error = std::io::Error::other("disk full").into();
        assert!(matches!(err.kind, ErrorKind::Io(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
