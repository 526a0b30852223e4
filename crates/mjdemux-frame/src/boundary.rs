use crate::error::{DemuxError, Result};

/// The only media type this demultiplexer understands.
pub const MULTIPART_MIXED_REPLACE: &str = "multipart/x-mixed-replace";

const BOUNDARY_PARAM: &str = "boundary=";

/// The normalized multipart boundary token.
///
/// Servers declare the token in the `Content-Type` response header. Some
/// cameras declare `boundary=--myboundary` and then use the token as is
/// without prefixing it again, so normalization adds the `--` prefix only
/// when it is missing.
///
/// A line equal to the token opens the next part; a line equal to the token
/// followed by `--` closes the stream. Both comparisons are exact — no
/// trimming, no case folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    token: String,
}

impl Boundary {
    /// Normalize a declared boundary token.
    ///
    /// Fails with [`DemuxError::InvalidBoundary`] when the token is empty
    /// after trimming and prefix normalization.
    pub fn new(token: &str) -> Result<Self> {
        let declared = token.trim();
        let bare = declared.strip_prefix("--").unwrap_or(declared);
        if bare.is_empty() {
            return Err(DemuxError::InvalidBoundary);
        }
        Ok(Self {
            token: format!("--{bare}"),
        })
    }

    /// Derive the boundary from a `Content-Type` header value.
    ///
    /// The value must name the `multipart/x-mixed-replace` media type and
    /// carry a `boundary=` parameter; surrounding quotes on the parameter
    /// value are stripped.
    pub fn from_content_type(value: &str) -> Result<Self> {
        let value = value.trim();
        if !value.starts_with(MULTIPART_MIXED_REPLACE) {
            return Err(DemuxError::InvalidBoundary);
        }
        let start = value
            .find(BOUNDARY_PARAM)
            .ok_or(DemuxError::InvalidBoundary)?;
        let rest = &value[start + BOUNDARY_PARAM.len()..];
        let declared = rest.split(';').next().unwrap_or("").trim().trim_matches('"');
        Self::new(declared)
    }

    /// The normalized token, including the `--` prefix.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Exact match against the opening marker of a part.
    pub fn matches_open(&self, line: &str) -> bool {
        line == self.token
    }

    /// Exact match against the terminal `<token>--` marker.
    pub fn matches_close(&self, line: &str) -> bool {
        line.strip_prefix(self.token.as_str()) == Some("--")
    }
}
