//! Destination filename derivation.
//!
//! A URL maps to the basename of its percent-decoded form, made safe for a
//! single path component.

mod path;
mod sanitize;

pub use path::basename_of_decoded;
pub use sanitize::sanitize_component;

/// Name used when a URL has no usable basename (e.g. `https://example.com/`).
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Derives the local filename for `url`.
///
/// # Examples
///
/// - `destination_name("https://example.com/a/archive.zip")` → `"archive.zip"`
/// - `destination_name("https://example.com/My%20File.txt")` → `"My File.txt"`
/// - `destination_name("https://example.com/")` → `"download.bin"`
pub fn destination_name(url: &str) -> String {
    let raw = match basename_of_decoded(url) {
        Some(name) => name,
        None => return DEFAULT_FILENAME.to_string(),
    };

    let sanitized = sanitize_component(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}
