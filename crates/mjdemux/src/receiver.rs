use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use bytes::Bytes;
use mjdemux_frame::{DemuxError, MultipartFrameReader, Result};
use mjdemux_source::{SourceHandle, StreamSource};
use tracing::{debug, info, warn};

/// Drives a [`MultipartFrameReader`] on a worker thread and hands each
/// frame to a caller-supplied handler, in wire order.
///
/// The receiver owns only the thread and the source's close handle; the
/// reader itself moves into the worker. Stopping is cooperative: the close
/// handle makes the source report end-of-input at its next read, after
/// which the worker exits.
pub struct FrameReceiver {
    handle: SourceHandle,
    stopping: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl FrameReceiver {
    /// Spawn the worker thread.
    ///
    /// The handler is invoked once per frame, on the worker thread, in the
    /// order frames appear on the wire. The worker exits when the stream
    /// reaches its terminal boundary, fails, or is stopped.
    pub fn spawn(
        reader: MultipartFrameReader<StreamSource>,
        mut on_frame: impl FnMut(Bytes) + Send + 'static,
    ) -> Result<Self> {
        let handle = reader.close_handle();
        let stopping = Arc::new(AtomicBool::new(false));

        let worker_stopping = Arc::clone(&stopping);
        let mut reader = reader;
        let worker = std::thread::Builder::new()
            .name("mjdemux-receiver".into())
            .spawn(move || {
                info!("frame receiver started");
                loop {
                    match reader.next_frame() {
                        Ok(Some(frame)) => on_frame(frame),
                        Ok(None) => {
                            debug!("stream exhausted, receiver finished");
                            break;
                        }
                        Err(err) if worker_stopping.load(Ordering::Acquire) => {
                            debug!(error = %err, "stream ended by stop request");
                            break;
                        }
                        Err(err) => {
                            warn!(error = %err, "frame stream failed");
                            break;
                        }
                    }
                }
            })
            .map_err(DemuxError::Transport)?;

        Ok(Self {
            handle,
            stopping,
            worker: Some(worker),
        })
    }

    /// Request stop and wait for the worker to exit. Idempotent.
    pub fn stop(&mut self) {
        if !self.stopping.swap(true, Ordering::AcqRel) {
            info!("stopping frame receiver");
            self.handle.close();
        }
        self.join();
    }

    /// Wait for the worker to exit on its own (terminal boundary marker or
    /// stream failure).
    pub fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    /// True while the worker thread is still delivering frames.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|worker| !worker.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for FrameReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Mutex;

    use mjdemux_frame::Boundary;

    use super::*;

    fn wire(parts: &[&[u8]]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(b"--cam\r\n");
            body.extend_from_slice(format!("Content-Length: {}\r\n", part.len()).as_bytes());
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(part);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(b"--cam--\r\n");
        body
    }

    fn reader_over(body: Vec<u8>) -> MultipartFrameReader<StreamSource> {
        MultipartFrameReader::with_boundary(
            StreamSource::new(Cursor::new(body)),
            Boundary::new("cam").unwrap(),
        )
    }

    #[test]
    fn delivers_frames_in_wire_order() {
        let reader = reader_over(wire(&[b"one", b"two", b"three"]));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut receiver = FrameReceiver::spawn(reader, move |frame| {
            sink.lock().unwrap().push(frame);
        })
        .unwrap();

        receiver.join();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].as_ref(), b"one");
        assert_eq!(seen[1].as_ref(), b"two");
        assert_eq!(seen[2].as_ref(), b"three");
    }

    #[test]
    fn worker_exits_on_terminal_boundary() {
        let reader = reader_over(wire(&[]));
        let mut receiver = FrameReceiver::spawn(reader, |_| {}).unwrap();

        receiver.join();
        assert!(!receiver.is_running());
    }

    #[test]
    fn stop_ends_an_endless_stream() {
        // A source that never sends the terminal marker: only stop can end it.
        let reader = MultipartFrameReader::with_boundary(
            StreamSource::new(RepeatingParts::default()),
            Boundary::new("cam").unwrap(),
        );

        let delivered = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&delivered);
        let mut receiver = FrameReceiver::spawn(reader, move |_| {
            flag.store(true, Ordering::Release);
        })
        .unwrap();

        while !delivered.load(Ordering::Acquire) {
            std::thread::yield_now();
        }

        receiver.stop();
        assert!(!receiver.is_running());
    }

    #[test]
    fn stop_is_idempotent() {
        let reader = reader_over(wire(&[b"only"]));
        let mut receiver = FrameReceiver::spawn(reader, |_| {}).unwrap();

        receiver.stop();
        receiver.stop();
        assert!(!receiver.is_running());
    }

    #[test]
    fn worker_exits_on_framing_failure() {
        let body = b"--cam\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
        let reader = reader_over(body);

        let seen = Arc::new(Mutex::new(Vec::<Bytes>::new()));
        let sink = Arc::clone(&seen);
        let mut receiver = FrameReceiver::spawn(reader, move |frame| {
            sink.lock().unwrap().push(frame);
        })
        .unwrap();

        receiver.join();
        assert!(seen.lock().unwrap().is_empty());
    }

    /// Emits well-formed parts forever.
    #[derive(Default)]
    struct RepeatingParts {
        pending: Vec<u8>,
        offset: usize,
    }

    impl std::io::Read for RepeatingParts {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.offset >= self.pending.len() {
                self.pending = b"--cam\r\nContent-Length: 4\r\n\r\ntick\r\n".to_vec();
                self.offset = 0;
            }
            let n = (self.pending.len() - self.offset).min(buf.len());
            buf[..n].copy_from_slice(&self.pending[self.offset..self.offset + n]);
            self.offset += n;
            Ok(n)
        }
    }
}
