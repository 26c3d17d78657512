//! Single path component sanitization.

/// Replaces NUL, `\`, and control characters with `_` and caps the length at
/// 255 bytes (Linux NAME_MAX). Spaces and punctuation are kept as-is.
pub fn sanitize_component(name: &str) -> String {
    const NAME_MAX: usize = 255;

    let out: String = name
        .chars()
        .map(|c| if c == '\\' || c.is_control() { '_' } else { c })
        .collect();

    if out.len() > NAME_MAX {
        let mut take = NAME_MAX;
        while take > 0 && !out.is_char_boundary(take) {
            take -= 1;
        }
        out[..take].to_string()
    } else {
        out
    }
}
