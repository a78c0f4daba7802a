//! Output streamer — forwards PDF bytes to the HTTP response body.
//!
//! Serialization runs on a blocking task; bytes flow through a bounded
//! channel in fixed-size chunks to the response stream. Once the first chunk
//! is out, response metadata is frozen: a later failure can only be logged
//! and surfaced as stream termination, never as a different status code.

use axum::body::Body;
use bytes::Bytes;
use futures::stream;
use tokio::sync::mpsc;
use tracing::error;

use crate::layout::cursor::PageGeometry;
use crate::layout::document::PageOps;
use crate::render::pdf::{self, RenderError};

const CHUNK_SIZE: usize = 64 * 1024;

/// Builds the streaming response body for an assembled document.
pub fn pdf_body(pages: Vec<PageOps>, geometry: PageGeometry) -> Body {
    let (tx, rx) = mpsc::channel::<Result<Bytes, RenderError>>(4);

    tokio::task::spawn_blocking(move || match pdf::render(&pages, &geometry) {
        Ok(bytes) => {
            for chunk in bytes.chunks(CHUNK_SIZE) {
                if tx.blocking_send(Ok(Bytes::copy_from_slice(chunk))).is_err() {
                    // Client hung up; nothing left to deliver.
                    return;
                }
            }
        }
        Err(err) => {
            // Headers may already be on the wire: terminate the stream and
            // keep the process alive.
            error!(%err, "PDF render failed after response start");
            let _ = tx.blocking_send(Err(err));
        }
    });

    Body::from_stream(stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
