/// Errors that can occur while demultiplexing a multipart stream.
#[derive(Debug, thiserror::Error)]
pub enum DemuxError {
    /// The boundary token was empty after normalization.
    #[error("invalid boundary token (empty after normalization)")]
    InvalidBoundary,

    /// A part's header block lacked a usable `Content-Length`.
    ///
    /// `value` carries the declared header value when one was present but
    /// unparseable; `None` means the header was absent entirely.
    #[error("missing or invalid Content-Length{}", match value {
        Some(v) => format!(" (got {v:?})"),
        None => String::new(),
    })]
    MissingOrInvalidLength { value: Option<String> },

    /// The stream ended while a boundary, header block, or payload was only
    /// partially read.
    #[error("unexpected end of stream (incomplete part)")]
    UnexpectedEndOfStream,

    /// An I/O error occurred while reading from the byte source.
    #[error("transport I/O error: {0}")]
    Transport(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DemuxError>;
