//! Upload file-name sanitization.

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

/// Characters outside this set are replaced with `_`.
static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap());

const MAX_FILE_NAME_CHARS: usize = 100;

/// Reduces a client-supplied file name to a safe single path segment.
///
/// Directory components are dropped, unsafe characters collapse to `_`, and
/// leading dots are removed so the result can never be hidden or traverse.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if nothing usable remains.
pub fn sanitize_file_name(name: &str) -> Result<String, AppError> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned = UNSAFE_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');
    let cleaned: String = cleaned.chars().take(MAX_FILE_NAME_CHARS).collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_' || c == '.') {
        return Err(AppError::bad_request(
            "Invalid file name",
            json!({ "name": name }),
        ));
    }

    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_simple_names() {
        assert_eq!(sanitize_file_name("cover.jpg").unwrap(), "cover.jpg");
    }

    #[test]
    fn test_drops_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name(r"C:\photos\me.png").unwrap(), "me.png");
    }

    #[test]
    fn test_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("my photo (1).png").unwrap(), "my_photo_1_.png");
    }

    #[test]
    fn test_rejects_empty_results() {
        assert!(sanitize_file_name("").is_err());
        assert!(sanitize_file_name("...").is_err());
        assert!(sanitize_file_name("dir/").is_err());
    }
}
