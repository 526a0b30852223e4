use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

/// A connected, readable byte source with an explicit open flag.
///
/// Wraps whatever transport delivered the multipart body — a TCP stream, an
/// HTTP response body reader, a file. Once closed, every subsequent read
/// reports end-of-input, which readers layered on top surface as the stream
/// having ended.
///
/// The source is owned exclusively by whoever reads from it; [`handle`]
/// hands out a clonable [`SourceHandle`] that can only request close, never
/// read.
///
/// [`handle`]: StreamSource::handle
pub struct StreamSource {
    inner: Box<dyn Read + Send>,
    open: Arc<AtomicBool>,
}

impl StreamSource {
    /// Wrap a connected byte stream.
    pub fn new(inner: impl Read + Send + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the source is still open.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// A handle for requesting close from another thread.
    ///
    /// Closing is cooperative: a read already blocked inside the underlying
    /// stream is not interrupted, but the next read call reports
    /// end-of-input.
    pub fn handle(&self) -> SourceHandle {
        SourceHandle {
            open: Arc::clone(&self.open),
        }
    }

    /// Close the source and release the underlying stream. Idempotent.
    pub fn close(&mut self) {
        if self.open.swap(false, Ordering::AcqRel) {
            debug!("byte source closed");
        }
        self.inner = Box::new(std::io::empty());
    }
}

impl Read for StreamSource {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if !self.open.load(Ordering::Acquire) {
            return Ok(0);
        }
        self.inner.read(buf)
    }
}

/// Clonable close handle for a [`StreamSource`].
///
/// Flipping the shared open flag is the only operation; the handle never
/// reads, so it is safe to hold on any thread while the source is being
/// drained elsewhere.
#[derive(Clone)]
pub struct SourceHandle {
    open: Arc<AtomicBool>,
}

impl SourceHandle {
    /// Request close. Idempotent.
    pub fn close(&self) {
        if self.open.swap(false, Ordering::AcqRel) {
            debug!("byte source close requested");
        }
    }

    /// Whether the source is still open.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}
