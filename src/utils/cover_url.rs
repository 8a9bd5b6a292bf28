//! Cover image URL normalization.

use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum CoverUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Parses a cover image URL, accepting only `http`/`https` and dropping the fragment.
///
/// Blank input means "no cover" and yields `Ok(None)`.
pub fn normalize_cover_url(raw: &str) -> Result<Option<String>, CoverUrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut url = Url::parse(trimmed).map_err(|e| CoverUrlError::InvalidFormat(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CoverUrlError::UnsupportedProtocol);
    }

    url.set_fragment(None);
    Ok(Some(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https() {
        assert_eq!(
            normalize_cover_url("https://cdn.example.com/a.jpg#top").unwrap(),
            Some("https://cdn.example.com/a.jpg".to_string())
        );
    }

    #[test]
    fn test_blank_is_none() {
        assert_eq!(normalize_cover_url("  ").unwrap(), None);
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            normalize_cover_url("javascript:alert(1)"),
            Err(CoverUrlError::UnsupportedProtocol)
        ));
        assert!(matches!(
            normalize_cover_url("not a url"),
            Err(CoverUrlError::InvalidFormat(_))
        ));
    }
}
