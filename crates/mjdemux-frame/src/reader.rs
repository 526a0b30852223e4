use std::io::Read;

use bytes::Bytes;
use mjdemux_source::{SourceHandle, StreamSource};
use tracing::{debug, trace};

use crate::boundary::Boundary;
use crate::error::{DemuxError, Result};
use crate::headers::PartHeaders;
use crate::line::LineReader;

/// Reader lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Constructed, no bytes consumed yet.
    Idle,
    /// Actively producing frames.
    Streaming,
    /// Terminal. Entered on the closing boundary marker, on any fatal pull
    /// error, or on an explicit close; never left.
    Exhausted,
}

/// Pull-based demultiplexer for a `multipart/x-mixed-replace` body.
///
/// Owns the byte source and the negotiated boundary. Each pull scans
/// forward to the next boundary marker, parses the part's header block, and
/// returns exactly `Content-Length` bytes of payload as an independently
/// owned buffer. Frames come back strictly in wire order; the sequence is
/// lazy, forward-only, and ends for good once the closing marker (or a
/// failure) is seen — a new reader over a new connection is required to
/// resume.
///
/// Pulls take `&mut self` and are therefore serialized by the borrow
/// checker; to share a reader across threads, wrap it in a `Mutex` and
/// pulls stay sequential but become callable from anywhere.
///
/// Reads block for as long as the source does. The reader imposes no
/// timeout of its own; cancellation is cooperative, via the source
/// (see [`close_handle`]).
///
/// [`close_handle`]: MultipartFrameReader::close_handle
#[derive(Debug)]
pub struct MultipartFrameReader<T> {
    lines: LineReader<T>,
    boundary: Boundary,
    state: State,
}

impl<T: Read> MultipartFrameReader<T> {
    /// Create a reader over a connected byte source.
    ///
    /// `boundary` is the token declared in the `Content-Type` response
    /// header, with or without its `--` prefix. No I/O happens until the
    /// first pull. Fails with [`DemuxError::InvalidBoundary`] when the
    /// token is empty after normalization.
    pub fn new(inner: T, boundary: &str) -> Result<Self> {
        Ok(Self::with_boundary(inner, Boundary::new(boundary)?))
    }

    /// Create a reader with an already-normalized [`Boundary`].
    pub fn with_boundary(inner: T, boundary: Boundary) -> Self {
        Self {
            lines: LineReader::new(inner),
            boundary,
            state: State::Idle,
        }
    }

    /// Pull the next frame (blocking).
    ///
    /// Returns `Ok(None)` once the stream is exhausted: the closing
    /// `<boundary>--` marker was read or [`close`] was called. Every error
    /// is fatal to the sequence — the reader does not resynchronize after a
    /// framing failure — so pulls after an error also report exhaustion.
    ///
    /// [`close`]: MultipartFrameReader::close
    pub fn next_frame(&mut self) -> Result<Option<Bytes>> {
        if self.state == State::Exhausted {
            return Ok(None);
        }
        self.state = State::Streaming;

        match self.pull() {
            Ok(Some(frame)) => Ok(Some(frame)),
            Ok(None) => {
                self.state = State::Exhausted;
                debug!("closing boundary marker read, stream exhausted");
                Ok(None)
            }
            Err(err) => {
                self.state = State::Exhausted;
                debug!(error = %err, "pull failed, stream exhausted");
                Err(err)
            }
        }
    }

    fn pull(&mut self) -> Result<Option<Bytes>> {
        if !self.scan_to_boundary()? {
            return Ok(None);
        }

        let headers = PartHeaders::read_from(&mut self.lines)?;
        let length = headers.content_length()?;
        let frame = self.lines.read_exact(length)?;
        trace!(len = frame.len(), "frame assembled");
        Ok(Some(frame))
    }

    /// Skip inter-part padding until a boundary marker.
    ///
    /// Returns `false` when the marker is the terminal `<boundary>--`.
    /// End-of-input before either marker is an abrupt termination.
    fn scan_to_boundary(&mut self) -> Result<bool> {
        loop {
            let line = self
                .lines
                .read_line()?
                .ok_or(DemuxError::UnexpectedEndOfStream)?;

            if self.boundary.matches_open(&line) {
                return Ok(true);
            }
            if self.boundary.matches_close(&line) {
                return Ok(false);
            }
        }
    }

    /// Stop producing frames. Idempotent.
    ///
    /// Subsequent pulls report exhaustion. The underlying source is
    /// released when the reader is dropped (or immediately, for
    /// [`StreamSource`] readers via [`shutdown`]).
    ///
    /// [`shutdown`]: MultipartFrameReader::shutdown
    pub fn close(&mut self) {
        if self.state != State::Exhausted {
            self.state = State::Exhausted;
            debug!("reader closed");
        }
    }

    /// True once no further frames can be produced.
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// The normalized boundary in use.
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        self.lines.get_ref()
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        self.lines.get_mut()
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.lines.into_inner()
    }
}

impl MultipartFrameReader<StreamSource> {
    /// A handle for requesting close from another thread.
    ///
    /// Cooperative: a pull blocked inside a read finishes the current read
    /// call first, then observes the closed source and surfaces end of
    /// stream.
    pub fn close_handle(&self) -> SourceHandle {
        self.get_ref().handle()
    }

    /// Close the reader and release the underlying source immediately.
    /// Idempotent.
    pub fn shutdown(&mut self) {
        self.get_mut().close();
        self.close();
    }
}

impl<T: Read> Iterator for MultipartFrameReader<T> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}
