//! Output file naming — sanitized title or stable fallback identifier.

/// Characters that are reserved on at least one supported filesystem
const RESERVED_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Derive the output file name for a download.
///
/// Uses the video title when every character is within the supported
/// encoding range (ASCII), otherwise falls back to the canonical video id,
/// which is stable and always representable. The negotiated container
/// extension is appended in both cases.
pub(crate) fn output_file_name(title: &str, video_id: &str, container: &str) -> String {
    let base = sanitize(title).filter(|_| title.is_ascii());
    let base = base.unwrap_or_else(|| video_id.to_string());
    format!("{base}.{container}")
}

/// Replace reserved/control characters, returning `None` when nothing
/// usable remains.
fn sanitize(title: &str) -> Option<String> {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if RESERVED_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
