//! Demultiplexing of `multipart/x-mixed-replace` motion-JPEG bodies.
//!
//! This is the core value-add layer of mjdemux. The wire format interleaves
//! parts like this:
//!
//! ```text
//! --<boundary>\r\n
//! Content-Length: <n>\r\n
//! \r\n
//! <n bytes of JPEG data>\r\n
//! --<boundary>--\r\n        (terminal marker)
//! ```
//!
//! [`MultipartFrameReader`] turns that into a lazy, forward-only sequence of
//! frame buffers, one per part, each exactly the declared length. No partial
//! reads, no buffer management in user code.

pub mod boundary;
pub mod error;
pub mod headers;
pub mod line;
pub mod reader;

pub use boundary::{Boundary, MULTIPART_MIXED_REPLACE};
pub use error::{DemuxError, Result};
pub use headers::{PartHeaders, CONTENT_LENGTH};
pub use line::LineReader;
pub use reader::MultipartFrameReader;
