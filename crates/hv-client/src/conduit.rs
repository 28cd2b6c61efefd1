//! Bounded in-memory byte hand-off between a producer and a consumer.
//!
//! Exactly one [`ConduitWriter`] and one [`ConduitReader`] exist per
//! conduit. The writer blocks once `capacity` chunks are queued. Closing the
//! writer (or dropping it) ends the reader's stream; aborting it delivers an
//! error item instead so the consumer can tell a complete body from a
//! truncated one.
//!
//! If the reader is dropped before it has seen end-of-stream, it keeps
//! discarding chunks in a background task until the writer is done. A
//! consumer that gives up half way therefore never leaves the producer
//! blocked on a full conduit.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;
use tracing::trace;

use crate::error::{Error, ErrorKind, Result};

type Chunk = std::io::Result<Bytes>;

/// Create a conduit holding at most `capacity` chunks in flight.
pub fn conduit(capacity: usize) -> (ConduitWriter, ConduitReader) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let writer = ConduitWriter { tx, written: 0 };
    let reader = ConduitReader {
        rx: Some(rx),
        finished: false,
        runtime: tokio::runtime::Handle::try_current().ok(),
    };
    (writer, reader)
}

/// Producing end of a conduit.
#[derive(Debug)]
pub struct ConduitWriter {
    tx: mpsc::Sender<Chunk>,
    written: u64,
}

impl ConduitWriter {
    /// Queue a chunk, waiting while the conduit is full.
    pub async fn write(&mut self, chunk: Bytes) -> Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        let len = chunk.len() as u64;
        self.tx
            .send(Ok(chunk))
            .await
            .map_err(|_| Error::new(ErrorKind::Io("upload conduit closed by reader".to_string())))?;
        self.written += len;
        Ok(())
    }

    /// Bytes accepted so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Signal end-of-stream. Returns the total bytes written.
    pub fn close(self) -> u64 {
        self.written
    }

    /// End the stream with an error item.
    pub async fn abort(self, error: std::io::Error) {
        // A reader that is already gone has nothing left to tell.
        let _ = self.tx.send(Err(error)).await;
    }
}

/// Consuming end of a conduit, usable as a request body stream.
#[derive(Debug)]
pub struct ConduitReader {
    rx: Option<mpsc::Receiver<Chunk>>,
    finished: bool,
    runtime: Option<tokio::runtime::Handle>,
}

impl Stream for ConduitReader {
    type Item = Chunk;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(rx) = this.rx.as_mut() else {
            return Poll::Ready(None);
        };
        match rx.poll_recv(cx) {
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl Drop for ConduitReader {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let Some(mut rx) = self.rx.take() else {
            return;
        };
        match &self.runtime {
            Some(runtime) => {
                runtime.spawn(async move {
                    let mut discarded = 0u64;
                    while let Some(chunk) = rx.recv().await {
                        if let Ok(chunk) = chunk {
                            discarded += chunk.len() as u64;
                        }
                    }
                    trace!(discarded, "Drained abandoned upload conduit");
                });
            }
            // No runtime to drain on: close so pending and future writes fail fast.
            None => rx.close(),
        }
    }
}
