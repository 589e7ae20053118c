//! URL validation and normalization for analysis input.

use log::warn;

/// Maximum accepted URL length, matching common browser and server limits.
const MAX_URL_LENGTH: usize = 2048;

/// Validates and normalizes a URL supplied by a caller.
///
/// Adds an `https://` prefix when no scheme is present, then checks that the
/// result parses and uses an http/https scheme. Returns `None` (with a
/// warning) for anything invalid, overlong, or using another scheme.
pub fn validate_and_normalize_url(url: &str) -> Option<String> {
    if url.len() > MAX_URL_LENGTH {
        warn!(
            "Rejecting URL exceeding maximum length ({} > {MAX_URL_LENGTH})",
            url.len()
        );
        return None;
    }

    let normalized = if !url.starts_with("http://") && !url.starts_with("https://") {
        format!("https://{url}")
    } else {
        url.to_string()
    };

    match url::Url::parse(&normalized) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => Some(normalized),
            _ => {
                warn!("Rejecting unsupported scheme for URL: {url}");
                None
            }
        },
        Err(_) => {
            warn!("Rejecting invalid URL: {url}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validate_and_normalize_url;

    #[test]
    fn test_adds_https_prefix() {
        assert_eq!(
            validate_and_normalize_url("example.com"),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn test_preserves_existing_scheme() {
        assert_eq!(
            validate_and_normalize_url("http://example.com"),
            Some("http://example.com".to_string())
        );
        assert_eq!(
            validate_and_normalize_url("https://example.com/a?b=c"),
            Some("https://example.com/a?b=c".to_string())
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(validate_and_normalize_url("not a url at all!!!"), None);
    }

    #[test]
    fn test_rejects_overlong_url() {
        let long = format!("https://example.com/{}", "a".repeat(3000));
        assert_eq!(validate_and_normalize_url(&long), None);
    }
}
