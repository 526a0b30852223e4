//! Pull-based demultiplexing of motion-JPEG (`multipart/x-mixed-replace`)
//! streams.
//!
//! mjdemux takes an already-connected byte stream carrying a multipart
//! motion-JPEG body and exposes it as a lazy sequence of discrete frame
//! buffers. It performs no network I/O of its own: connecting (and any
//! timeout or reconnect policy) stays with the caller.
//!
//! # Crate Structure
//!
//! - [`source`] — closable byte-source wrapper over any `Read` transport
//! - [`frame`] — boundary scanning, header parsing, and the pull reader
//! - [`receiver`] — threaded frame delivery to a handler (behind the
//!   `receiver` feature)
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use mjdemux::frame::MultipartFrameReader;
//!
//! let body = b"--X\r\nContent-Length: 4\r\n\r\nABCD\r\n--X--\r\n".to_vec();
//! let mut reader = MultipartFrameReader::new(Cursor::new(body), "X")?;
//!
//! while let Some(frame) = reader.next_frame()? {
//!     assert_eq!(frame.as_ref(), b"ABCD");
//! }
//! # Ok::<(), mjdemux::frame::DemuxError>(())
//! ```

/// Re-export source types.
pub mod source {
    pub use mjdemux_source::*;
}

/// Re-export frame types.
pub mod frame {
    pub use mjdemux_frame::*;
}

#[cfg(feature = "receiver")]
pub mod receiver;

#[cfg(feature = "receiver")]
pub use receiver::FrameReceiver;
