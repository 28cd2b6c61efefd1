//! Streaming multipart upload.
//!
//! Two stages run concurrently for the lifetime of one upload:
//!
//! ```text
//!  MultipartForm ──► encoder ──► conduit (bounded) ──► transmitter ──► POST
//! ```
//!
//! The encoder writes the form fields, then copies the attachment reader
//! chunk by chunk, then the terminator. The transmitter takes a rate-limit
//! token and sends the reading end of the conduit as a streamed request
//! body. Memory use is bounded by `conduit_capacity * chunk_size` whatever
//! the attachment size.
//!
//! When the transmitter gives up early (connection refused, server
//! rejection) the transport drops the body, and the dropped conduit reader
//! drains whatever the encoder still writes, so the encoder always runs to
//! completion and both stages can be joined.

use bytes::{Bytes, BytesMut};
use tokio::io::AsyncReadExt;
use tracing::{debug, instrument, warn};

use crate::client::HarvestHttpClient;
use crate::conduit::{conduit, ConduitReader, ConduitWriter};
use crate::error::{Error, ErrorKind, Result};
use crate::multipart::{MultipartEncoder, MultipartForm};

/// Status and body of an accepted upload.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub status: u16,
    pub body: Bytes,
}

impl UploadResponse {
    /// Deserialize the response body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }
}

/// One multipart POST to a fixed URL.
#[derive(Debug, Clone)]
pub struct UploadPipeline {
    client: HarvestHttpClient,
    url: String,
    expected_status: u16,
}

impl UploadPipeline {
    /// Upload to `url`, treating `expected_status` as success.
    pub fn new(client: HarvestHttpClient, url: impl Into<String>, expected_status: u16) -> Self {
        Self {
            client,
            url: url.into(),
            expected_status,
        }
    }

    /// Encode and send `form`.
    ///
    /// Both stages are always awaited. An encoder failure is reported in
    /// preference to a transmitter failure, since it usually means bad
    /// input and it also makes the transmitter fail.
    #[instrument(skip(self, form), fields(url = %self.url, fields = form.fields.len(), file = form.has_file()))]
    pub async fn run(&self, form: MultipartForm) -> Result<UploadResponse> {
        let encoder = MultipartEncoder::new();
        let content_type = encoder.content_type();
        let upload = self.client.config().upload;
        let (writer, reader) = conduit(upload.conduit_capacity);

        let (encoded, transmitted) = tokio::join!(
            encode(form, encoder, writer, upload.chunk_size),
            self.transmit(content_type, reader),
        );

        match (encoded, transmitted) {
            (Err(err), transmitted) => {
                if let Err(transmit_err) = transmitted {
                    debug!(error = %transmit_err, "Transmitter also failed");
                }
                warn!(error = %err, "Upload encoding failed");
                Err(err)
            }
            (Ok(_), Err(err)) => {
                warn!(error = %err, "Upload transmission failed");
                Err(err)
            }
            (Ok(bytes), Ok(response)) => {
                debug!(bytes, status = response.status, "Upload complete");
                Ok(response)
            }
        }
    }

    async fn transmit(&self, content_type: String, body: ConduitReader) -> Result<UploadResponse> {
        let request = self
            .client
            .post(self.url.as_str())
            .header("Content-Type", content_type)
            .stream(body);

        let response = self
            .client
            .execute_expecting(request, self.expected_status)
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok(UploadResponse { status, body })
    }
}

/// Encoder stage: runs to completion or aborts the conduit on failure.
async fn encode(
    form: MultipartForm,
    encoder: MultipartEncoder,
    mut writer: ConduitWriter,
    chunk_size: usize,
) -> Result<u64> {
    match write_form(form, encoder, &mut writer, chunk_size).await {
        Ok(()) => {
            let written = writer.close();
            debug!(bytes = written, "Encoder finished");
            Ok(written)
        }
        Err(err) => {
            writer
                .abort(std::io::Error::other(format!("upload body aborted: {err}")))
                .await;
            Err(err)
        }
    }
}

async fn write_form(
    form: MultipartForm,
    mut encoder: MultipartEncoder,
    writer: &mut ConduitWriter,
    chunk_size: usize,
) -> Result<()> {
    let MultipartForm { fields, file } = form;

    for (name, value) in &fields {
        writer.write(encoder.field(name, value)).await?;
    }

    if let Some(mut file) = file {
        writer
            .write(encoder.file_header(&file.name, &file.filename, &file.content_type))
            .await?;

        let chunk_size = chunk_size.max(1);
        loop {
            let mut buf = BytesMut::with_capacity(chunk_size);
            let read = file.reader.read_buf(&mut buf).await.map_err(|e| {
                Error::with_source(
                    ErrorKind::Io(format!("reading {}: {e}", file.filename)),
                    e,
                )
            })?;
            if read == 0 {
                break;
            }
            writer.write(buf.freeze()).await?;
        }
    }

    writer.write(encoder.finish()).await
}

impl HarvestHttpClient {
    /// Stream `form` to `url` as `multipart/form-data`.
    pub async fn upload_multipart(
        &self,
        url: &str,
        form: MultipartForm,
        expected_status: u16,
    ) -> Result<UploadResponse> {
        UploadPipeline::new(self.clone(), url, expected_status)
            .run(form)
            .await
    }
}
