//! Filename helpers shared by every storage backend.

use uuid::Uuid;

/// Lowercase extension of `filename`: the text after the last `.`.
///
/// Returns an empty string when the name is blank, has no `.`, or ends with `.`.
pub fn extract_extension(filename: &str) -> String {
    if filename.trim().is_empty() {
        return String::new();
    }

    match filename.rfind('.') {
        Some(idx) if idx + 1 < filename.len() => filename[idx + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// Unique physical name for an upload: `{original_name}_{uuid}.{extension}`.
///
/// The extension is appended as-is, so an empty extension leaves a trailing `.`.
pub fn generate_stored_name(original_name: &str, extension: &str) -> String {
    format!("{}_{}.{}", original_name, Uuid::new_v4(), extension)
}
