//! Redaction of credentials before URLs and headers reach the logs.
//!
//! List URLs come from host configuration and from server-supplied links,
//! either of which may embed API keys, signed tokens or basic-auth
//! userinfo. Everything logged by the client goes through
//! [`redact_sensitive`] first.

use once_cell::sync::Lazy;
use regex::Regex;

const REPLACEMENT: &str = "[REDACTED]";

static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(build_redact_patterns);

/// Replaces credential-looking values in `input` with `[REDACTED]`, keeping
/// the key names.
///
/// # Example
/// ```rust
/// use chooser_util::redact_sensitive;
///
/// let url = "https://api.example.com/items/?page=2&api_key=abc123";
/// assert_eq!(redact_sensitive(url), "https://api.example.com/items/?page=2&api_key=[REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in REDACT_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                let suffix = captures.get(3).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{REPLACEMENT}{suffix}")
            })
            .into_owned();
    }
    redacted
}

fn build_redact_patterns() -> Vec<Regex> {
    [
        // Authorization headers and inline bearer credentials
        r"(?i)(authorization:\s+)([^\r\n]+)",
        r"(?i)(\bBearer\s+)([A-Za-z0-9\-._~+/]+=*)",
        // Query parameters with secret-looking names
        r"(?i)([?&](?:[a-z0-9_\-]*?(?:token|key|secret|password|signature|sig|auth))=)([^&#\s]+)",
        // userinfo in absolute URLs
        r"(?i)(\b[a-z][a-z0-9+.\-]*://)([^/@\s]+)(@)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_secret_query_parameters() {
        let url = "https://api.example.com/w/?page=2&access_token=abc&site=3&X-Amz-Signature=ff00";
        assert_eq!(
            redact_sensitive(url),
            "https://api.example.com/w/?page=2&access_token=[REDACTED]&site=3&X-Amz-Signature=[REDACTED]"
        );
    }

    #[test]
    fn redacts_userinfo_and_headers() {
        assert_eq!(
            redact_sensitive("https://user:pw@api.example.com/w/"),
            "https://[REDACTED]@api.example.com/w/"
        );
        assert_eq!(redact_sensitive("Authorization: Bearer abc.def"), "Authorization: [REDACTED]");
    }

    #[test]
    fn leaves_ordinary_urls_alone() {
        let url = "/api/widgets/?page_size=10&page=3&search=blue";
        assert_eq!(redact_sensitive(url), url);
    }
}
