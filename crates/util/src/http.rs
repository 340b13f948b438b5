//! # HTTP response helpers
//!
//! Parsing of list response bodies with diagnostics that are safe to log,
//! and user-facing hints for common failure statuses.

use chooser_types::ListResponse;
use thiserror::Error;

use crate::redact::redact_sensitive;

const PREVIEW_LIMIT: usize = 200;

/// Return a hint for HTTP statuses that usually mean misconfiguration.
///
/// # Example
/// ```rust
/// use chooser_util::http::status_error_message;
///
/// assert!(status_error_message(401).unwrap().contains("CHOOSER_API_TOKEN"));
/// assert!(status_error_message(404).unwrap().contains("endpoint"));
/// assert!(status_error_message(500).is_none());
/// ```
pub fn status_error_message(status_code: u16) -> Option<String> {
    match status_code {
        401 => Some("Unauthorized (401). Hint: set CHOOSER_API_TOKEN=...".into()),
        403 => Some("Forbidden (403). Hint: the token lacks access to this collection".into()),
        404 => Some("Not Found (404). Hint: check the picker endpoint and base URL".into()),
        _ => None,
    }
}

/// Decode a list body, decorating failures with the status and a truncated,
/// redacted preview of the payload.
pub fn parse_list_response(text: &str, status: Option<u16>) -> Result<ListResponse, JsonParseError> {
    serde_json::from_str::<ListResponse>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        let preview = redact_sensitive(&truncate_response_preview(text, PREVIEW_LIMIT));
        JsonParseError::new(status_note, error, preview)
    })
}

fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

/// Error returned when a list body cannot be decoded.
#[derive(Debug, Error)]
#[error("failed to parse list response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    /// The truncated response preview captured during parsing.
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}
