//! Classify raw response header lines as libcurl reports them.

/// What a single header line means for the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine {
    /// `HTTP/x.y NNN ...`: a new response starts (e.g. after a redirect).
    Status,
    /// `Content-Length`; `None` when present but not a non-negative integer.
    ContentLength(Option<u64>),
    Other,
}

pub fn classify_header_line(line: &str) -> HeaderLine {
    let line = line.trim();
    if line.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("HTTP/")) {
        return HeaderLine::Status;
    }
    match line.split_once(':') {
        Some((name, value)) if name.trim().eq_ignore_ascii_case("content-length") => {
            let value = value.trim();
            let parsed = value.parse::<u64>().ok();
            if parsed.is_none() {
                tracing::debug!(value, "ignoring invalid Content-Length");
            }
            HeaderLine::ContentLength(parsed)
        }
        _ => HeaderLine::Other,
    }
}
