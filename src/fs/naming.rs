//! Filename sanitization.

/// Longest name most filesystems accept for a single path component.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Device names Windows refuses as file names, regardless of extension.
const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Turn an arbitrary string (creator id, post title) into a safe path component.
///
/// Invalid characters become `_`, trailing spaces and dots are trimmed,
/// reserved device names get a `_` prefix, the result is capped at
/// [`MAX_FILENAME_LENGTH`] characters and never empty.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '\0' => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_end_matches([' ', '.']);

    let mut sanitized = if is_reserved_name(trimmed) {
        format!("_{}", trimmed)
    } else {
        trimmed.to_string()
    };

    if let Some((index, _)) = sanitized.char_indices().nth(MAX_FILENAME_LENGTH) {
        sanitized.truncate(index);
    }

    if sanitized.is_empty() {
        sanitized.push('_');
    }

    sanitized
}

fn is_reserved_name(name: &str) -> bool {
    let upper = name.to_uppercase();
    RESERVED_NAMES.contains(&upper.as_str())
}
