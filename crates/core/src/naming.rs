//! Presentation and download file naming.

/// Name used when the caller leaves the presentation name blank.
pub const DEFAULT_PRESENTATION_NAME: &str = "Lyrics";

/// Extension of the generated deck.
pub const PPTX_EXTENSION: &str = ".pptx";

/// Trim a caller-provided presentation name, falling back to the default.
pub fn presentation_name(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_PRESENTATION_NAME
    } else {
        trimmed
    }
}

/// Download filename for a presentation name.
///
/// Appends `.pptx` unless the name already ends with it, compared
/// case-insensitively.
pub fn resolve_filename(name: &str) -> String {
    let name = presentation_name(name);
    if name.to_lowercase().ends_with(PPTX_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, PPTX_EXTENSION)
    }
}

/// Presentation title with any `.pptx` suffix removed.
pub fn title_from_name(name: &str) -> &str {
    let name = presentation_name(name);
    let stem_len = name.len().saturating_sub(PPTX_EXTENSION.len());
    match name.get(stem_len..) {
        Some(suffix) if suffix.eq_ignore_ascii_case(PPTX_EXTENSION) && stem_len > 0 => {
            name[..stem_len].trim_end()
        }
        _ => name,
    }
}
