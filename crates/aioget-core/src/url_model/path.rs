//! Basename extraction from a percent-decoded URL.

use percent_encoding::percent_decode_str;

/// Percent-decodes the whole URL, then returns the text after the last `/`.
///
/// Decoding happens first, so an encoded `%2F` also acts as a separator.
/// Returns `None` when nothing follows the last slash.
pub fn basename_of_decoded(url: &str) -> Option<String> {
    let decoded = percent_decode_str(url.trim()).decode_utf8_lossy();
    let base = decoded.rsplit('/').next()?;
    if base.is_empty() {
        return None;
    }
    Some(base.to_string())
}
