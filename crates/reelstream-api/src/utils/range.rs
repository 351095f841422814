//! `Range` header resolution for byte-range streaming.
//!
//! Only the first `bytes=<start>-<end?>` range is honoured. A header that does
//! not match that shape is ignored and the full object is served.

use regex::Regex;
use std::sync::LazyLock;

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*bytes=(\d+)-(\d*)").expect("Range header pattern is a valid regex")
});

/// How a request's `Range` header applies to an object of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// No usable range: serve everything with 200.
    Full,
    /// Inclusive byte range to serve with 206.
    Partial { start: u64, end: u64 },
    /// Well-formed but outside the object: 416.
    Unsatisfiable,
}

impl ByteRange {
    pub fn resolve(header: Option<&str>, size: u64) -> Self {
        let Some(header) = header else {
            return ByteRange::Full;
        };
        let Some(captures) = RANGE_PATTERN.captures(header) else {
            return ByteRange::Full;
        };

        let Ok(start) = captures[1].parse::<u64>() else {
            return ByteRange::Full;
        };
        let requested_end = match &captures[2] {
            "" => None,
            digits => match digits.parse::<u64>() {
                Ok(end) => Some(end),
                Err(_) => return ByteRange::Full,
            },
        };

        if start >= size {
            return ByteRange::Unsatisfiable;
        }
        let last = size - 1;
        let end = requested_end.map_or(last, |end| end.min(last));
        if end < start {
            return ByteRange::Unsatisfiable;
        }

        ByteRange::Partial { start, end }
    }

    /// `Content-Range` value for a partial response.
    pub fn content_range(start: u64, end: u64, size: u64) -> String {
        format!("bytes {}-{}/{}", start, end, size)
    }

    /// `Content-Range` value for a 416 response.
    pub fn unsatisfied_content_range(size: u64) -> String {
        format!("bytes */{}", size)
    }
}
