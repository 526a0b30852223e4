use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};

use crate::error::{DemuxError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Buffered line scanner over a raw byte stream.
///
/// Serves both phases of multipart consumption from a single buffer: the
/// line-oriented phase (boundary markers and headers, delimited by LF with
/// an optional preceding CR) and the binary phase (exact-length payload
/// reads). Keeping both on one buffer means a chunked read that overshoots
/// a line never loses payload bytes, and all partial-read and EOF edge
/// cases live in one place.
#[derive(Debug)]
pub struct LineReader<T> {
    inner: T,
    buf: BytesMut,
    /// Latched once the source reports end-of-input.
    eof: bool,
}

impl<T: Read> LineReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            eof: false,
        }
    }

    /// Read the next line: the maximal run of bytes up to but excluding a
    /// line feed, with an immediately preceding carriage return stripped.
    ///
    /// Returns `Ok(None)` once the stream is exhausted. A final
    /// unterminated run is returned as a line, with the call after it
    /// reporting exhaustion. Lines are decoded lossily; the line-oriented
    /// portions of a multipart stream are ASCII.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let mut line = self.buf.split_to(pos + 1);
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(pos - 1);
                }
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            if self.eof {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let line = self.buf.split_to(self.buf.len());
                return Ok(Some(String::from_utf8_lossy(&line).into_owned()));
            }

            self.fill()?;
        }
    }

    /// Read exactly `len` bytes, draining buffered bytes first and
    /// accumulating partial reads from the source until the full length is
    /// available.
    ///
    /// End-of-input before `len` bytes is [`DemuxError::UnexpectedEndOfStream`].
    pub fn read_exact(&mut self, len: usize) -> Result<Bytes> {
        while self.buf.len() < len {
            if self.eof {
                return Err(DemuxError::UnexpectedEndOfStream);
            }
            self.fill()?;
        }
        Ok(self.buf.split_to(len).freeze())
    }

    /// Pull one chunk from the source into the scan buffer.
    ///
    /// Retries `Interrupted`; latches `eof` on a zero-length read.
    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let read = loop {
            match self.inner.read(&mut chunk) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(DemuxError::Transport(err)),
            }
        };

        if read == 0 {
            self.eof = true;
        } else {
            self.buf.extend_from_slice(&chunk[..read]);
        }
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    ///
    /// Bytes already pulled into the scan buffer are discarded.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
