//! Byte-range slicing for the video proxy.
//!
//! Only single ranges are honored. A malformed or multi-range header is
//! ignored and the full object is served, as RFC 9110 allows.

use percent_encoding::percent_decode_str;

/// How to answer a request for an object of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve the whole object with 200.
    Full,
    /// Serve bytes `start..=end` with 206.
    Partial { start: u64, end: u64 },
    /// Answer 416 with `Content-Range: bytes */size`.
    Unsatisfiable,
}

/// A parsed `bytes=` range before it is resolved against the object size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteRange {
    /// `START-` or `START-END`.
    From { start: u64, end: Option<u64> },
    /// `-N`: the last N bytes.
    Suffix(u64),
}

fn parse_byte_range(header: &str) -> Option<ByteRange> {
    let spec = header.trim().strip_prefix("bytes=")?.trim();
    if spec.contains(',') {
        return None;
    }
    let (first, last) = spec.split_once('-')?;
    let (first, last) = (first.trim(), last.trim());
    if first.is_empty() {
        return last.parse::<u64>().ok().map(ByteRange::Suffix);
    }
    let start = first.parse::<u64>().ok()?;
    let end = if last.is_empty() { None } else { Some(last.parse::<u64>().ok()?) };
    Some(ByteRange::From { start, end })
}

/// Resolve an optional `Range` header value against an object of `size` bytes.
#[must_use]
pub fn parse_range(header: Option<&str>, size: u64) -> RangeOutcome {
    let Some(range) = header.and_then(parse_byte_range) else {
        return RangeOutcome::Full;
    };
    match range {
        ByteRange::Suffix(0) => RangeOutcome::Unsatisfiable,
        ByteRange::Suffix(_) if size == 0 => RangeOutcome::Unsatisfiable,
        ByteRange::Suffix(n) => RangeOutcome::Partial { start: size.saturating_sub(n), end: size - 1 },
        ByteRange::From { start, end } => {
            if start >= size {
                return RangeOutcome::Unsatisfiable;
            }
            let end = end.map_or(size - 1, |e| e.min(size - 1));
            if start > end {
                return RangeOutcome::Unsatisfiable;
            }
            RangeOutcome::Partial { start, end }
        }
    }
}

/// `Content-Range` value for a served slice.
#[must_use]
pub fn content_range(start: u64, end: u64, size: u64) -> String {
    format!("bytes {start}-{end}/{size}")
}

/// Pick a content type: the stored one if present and specific, otherwise
/// guessed from the path's extension.
#[must_use]
pub fn content_type_for(path: &str, stored: Option<&str>) -> String {
    if let Some(stored) = stored.filter(|t| !t.is_empty() && *t != "application/octet-stream") {
        return stored.to_string();
    }
    let ext = path.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()).unwrap_or_default();
    match ext.as_str() {
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "m3u8" => "application/vnd.apple.mpegurl",
        "ogv" => "video/ogg",
        _ => "video/mp4",
    }
    .to_string()
}

/// Whether a requested object path is safe to forward to storage.
///
/// Rejects `?`, `#` and any segment that is `.` or `..` once
/// percent-decoded, since URL parsers collapse `%2e%2e` like `..`.
#[must_use]
pub fn is_valid_object_path(path: &str) -> bool {
    let trimmed = path.trim().trim_start_matches('/');
    if trimmed.is_empty() || trimmed.contains(['?', '#']) {
        return false;
    }
    !trimmed.split('/').any(is_dot_segment)
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    matches!(decoded.trim(), "." | "..")
}

#[cfg(test)]
#[path = "video_stream_test.rs"]
mod tests;
