//! Common utilities for the upload handler

use axum::extract::Multipart;
use bytes::Bytes;
use filestore_core::AppError;

/// A file pulled out of a multipart request.
#[derive(Debug)]
pub struct MultipartFile {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
}

/// Extract file data, filename, and content type from multipart form.
/// Only one field named "file" is accepted; other fields are ignored.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<MultipartFile, AppError> {
    let mut file_data: Option<Bytes> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if file_data.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            filename = field.file_name().map(|s: &str| s.to_string());
            content_type = field.content_type().map(|s: &str| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            file_data = Some(data);
        }
    }

    let data = file_data.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    let filename = sanitize_filename(filename.as_deref().unwrap_or(""));
    let content_type = content_type
        .filter(|ct| !ct.trim().is_empty())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(MultipartFile {
        data,
        filename,
        content_type,
    })
}

/// Longest name kept, in bytes. The stored name appends `_<uuid>.<ext>` and must
/// still fit in a single 255-byte path component.
const MAX_FILENAME_BYTES: usize = 200;

/// Extensions up to this many bytes survive truncation of a long name.
const MAX_KEPT_EXTENSION_BYTES: usize = 16;

/// Reduce an uploaded filename to its final path component.
///
/// Both `/` and `\` count as separators. Control characters are dropped. Long names
/// are shortened to [`MAX_FILENAME_BYTES`], keeping a short extension. An empty
/// result becomes `unknown`.
pub fn sanitize_filename(filename: &str) -> String {
    let last = filename.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(filename);

    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let trimmed = cleaned.trim();
    let sanitized = if trimmed.len() > MAX_FILENAME_BYTES {
        shorten(trimmed)
    } else {
        trimmed.to_string()
    };

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        return "unknown".to_string();
    }

    sanitized
}

fn shorten(name: &str) -> String {
    match name.rfind('.') {
        Some(dot) if name.len() - dot <= MAX_KEPT_EXTENSION_BYTES + 1 => {
            let (stem, extension) = name.split_at(dot);
            let stem = truncate_bytes(stem, MAX_FILENAME_BYTES - extension.len());
            format!("{}{}", stem.trim_end(), extension)
        }
        _ => truncate_bytes(name, MAX_FILENAME_BYTES).trim_end().to_string(),
    }
}

/// Longest prefix of `s` within `max` bytes, cut on a char boundary.
fn truncate_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("Quarterly report.pdf"), "Quarterly report.pdf");
        assert_eq!(sanitize_filename("résumé.docx"), "résumé.docx");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd.txt"), "passwd.txt");
        assert_eq!(sanitize_filename("C:\\Users\\me\\scan.png"), "scan.png");
    }

    #[test]
    fn test_sanitize_falls_back_to_unknown() {
        assert_eq!(sanitize_filename(""), "unknown");
        assert_eq!(sanitize_filename("uploads/"), "unknown");
        assert_eq!(sanitize_filename(".."), "unknown");
    }

    #[test]
    fn test_sanitize_drops_control_characters() {
        assert_eq!(sanitize_filename("a\r\nb.txt"), "ab.txt");
    }

    #[test]
    fn test_sanitize_shortens_long_names_keeping_extension() {
        let name = format!("{}.txt", "a".repeat(240));
        let sanitized = sanitize_filename(&name);
        assert_eq!(sanitized.len(), MAX_FILENAME_BYTES);
        assert!(sanitized.ends_with("a.txt"));
    }

    #[test]
    fn test_sanitize_cuts_multibyte_names_on_char_boundary() {
        let name = format!("{}.pdf", "é".repeat(150));
        let sanitized = sanitize_filename(&name);
        assert!(sanitized.len() <= MAX_FILENAME_BYTES);
        assert!(sanitized.ends_with("é.pdf"));
    }

    #[test]
    fn test_sanitize_shortens_names_with_long_suffix() {
        let name = format!("report.{}", "x".repeat(250));
        let sanitized = sanitize_filename(&name);
        assert_eq!(sanitized.len(), MAX_FILENAME_BYTES);
        assert!(sanitized.starts_with("report."));
    }
}
