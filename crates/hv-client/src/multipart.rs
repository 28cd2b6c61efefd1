//! `multipart/form-data` framing.
//!
//! The encoder only produces the framing bytes (part headers, separators,
//! terminator). Part bodies are written by the caller between calls, which
//! keeps a large attachment out of memory.
//!
//! ```text
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="spent_date"\r\n
//! \r\n
//! 2024-05-01
//! \r\n--<boundary>\r\n
//! Content-Disposition: form-data; name="receipt"; filename="r.pdf"\r\n
//! Content-Type: application/pdf\r\n
//! \r\n
//! <file bytes>
//! \r\n--<boundary>--\r\n
//! ```

use std::pin::Pin;

use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng;
use tokio::io::AsyncRead;

/// Name of the file part expected by the expenses endpoint.
pub const DEFAULT_FILE_FIELD: &str = "receipt";

/// Writes multipart framing for one body.
#[derive(Debug, Clone)]
pub struct MultipartEncoder {
    boundary: String,
    parts: usize,
}

impl Default for MultipartEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartEncoder {
    /// Create an encoder with a fresh random boundary.
    pub fn new() -> Self {
        let mut raw = [0u8; 16];
        rand::rng().fill(&mut raw[..]);
        let boundary: String = raw.iter().map(|b| format!("{b:02x}")).collect();
        Self::with_boundary(boundary)
    }

    /// Create an encoder with a fixed boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: 0,
        }
    }

    /// The boundary value.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// A complete text field part.
    pub fn field(&mut self, name: &str, value: &str) -> Bytes {
        let disposition = format!("form-data; name=\"{}\"", escape_quotes(name));
        let mut buf = self.part_header(&[("Content-Disposition", disposition)]);
        buf.put_slice(value.as_bytes());
        buf.freeze()
    }

    /// Headers of a file part. The file content follows directly.
    pub fn file_header(&mut self, name: &str, filename: &str, content_type: &str) -> Bytes {
        let disposition = format!(
            "form-data; name=\"{}\"; filename=\"{}\"",
            escape_quotes(name),
            escape_quotes(filename)
        );
        self.part_header(&[
            ("Content-Disposition", disposition),
            ("Content-Type", content_type.to_string()),
        ])
        .freeze()
    }

    /// The closing delimiter.
    pub fn finish(&self) -> Bytes {
        let mut buf = BytesMut::new();
        if self.parts > 0 {
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        buf.freeze()
    }

    fn part_header(&mut self, headers: &[(&str, String)]) -> BytesMut {
        let mut buf = BytesMut::new();
        if self.parts > 0 {
            buf.put_slice(b"\r\n");
        }
        buf.put_slice(format!("--{}\r\n", self.boundary).as_bytes());
        for (name, value) in headers {
            buf.put_slice(format!("{name}: {value}\r\n").as_bytes());
        }
        buf.put_slice(b"\r\n");
        self.parts += 1;
        buf
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// A lazily read attachment.
pub struct FilePart {
    pub(crate) name: String,
    pub(crate) filename: String,
    pub(crate) content_type: String,
    pub(crate) reader: Pin<Box<dyn AsyncRead + Send>>,
}

impl std::fmt::Debug for FilePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilePart")
            .field("name", &self.name)
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

impl FilePart {
    /// A `receipt` part read from `reader` until end of file.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        reader: impl AsyncRead + Send + 'static,
    ) -> Self {
        Self {
            name: DEFAULT_FILE_FIELD.to_string(),
            filename: filename.into(),
            content_type: content_type.into(),
            reader: Box::pin(reader),
        }
    }

    /// Use a form field name other than `receipt`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// Text fields in declaration order plus an optional attachment.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub(crate) fields: Vec<(String, String)>,
    pub(crate) file: Option<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field. Fields are transmitted in the order added.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Attach a file, replacing any previous attachment.
    pub fn file(mut self, file: FilePart) -> Self {
        self.file = Some(file);
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }
}
