//! Byte-source abstraction for mjdemux.
//!
//! The demultiplexer does not open connections of its own; the caller hands
//! it an already-connected byte stream (typically an HTTP response body).
//! This crate wraps that stream in a [`StreamSource`] with an explicit open
//! flag, so readers layered on top can be shut down cooperatively from
//! another thread via a [`SourceHandle`].
//!
//! This is the lowest layer of mjdemux. Everything else builds on top of
//! the [`StreamSource`] type provided here.

pub mod source;

pub use source::{SourceHandle, StreamSource};
