use std::collections::HashMap;
use std::io::Read;

use crate::error::{DemuxError, Result};
use crate::line::LineReader;

/// Header name carrying the payload length of a part.
pub const CONTENT_LENGTH: &str = "content-length";

const HEADER_SEPARATOR: &str = ": ";

/// The header block of a single part.
///
/// Names are lower-cased at parse time, so lookups are case-insensitive.
/// Parsed fresh for every part and discarded once the payload length has
/// been resolved; insertion order is not preserved.
#[derive(Debug, Default)]
pub struct PartHeaders {
    fields: HashMap<String, String>,
}

impl PartHeaders {
    /// Read a header block: one header per line, terminated by an empty
    /// line.
    ///
    /// Lines with no `": "` separator are skipped rather than treated as
    /// fatal; some servers emit malformed padding here. End-of-input inside
    /// the block is [`DemuxError::UnexpectedEndOfStream`].
    pub fn read_from<T: Read>(lines: &mut LineReader<T>) -> Result<Self> {
        let mut fields = HashMap::new();
        loop {
            let line = lines
                .read_line()?
                .ok_or(DemuxError::UnexpectedEndOfStream)?;

            if line.trim().is_empty() {
                return Ok(Self { fields });
            }

            if let Some((name, value)) = line.split_once(HEADER_SEPARATOR) {
                fields.insert(name.to_ascii_lowercase(), value.to_string());
            }
        }
    }

    /// Case-insensitive header lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Number of parsed headers.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve the declared payload length.
    ///
    /// Strict base-10 parsing; an absent header, a non-numeric value, and a
    /// non-positive value are all [`DemuxError::MissingOrInvalidLength`].
    /// A part with no usable length never becomes an empty or recycled
    /// frame.
    pub fn content_length(&self) -> Result<usize> {
        let value = self
            .get(CONTENT_LENGTH)
            .ok_or(DemuxError::MissingOrInvalidLength { value: None })?;

        match value.trim().parse::<i64>() {
            Ok(n) if n > 0 => Ok(n as usize),
            _ => Err(DemuxError::MissingOrInvalidLength {
                value: Some(value.to_owned()),
            }),
        }
    }
}
