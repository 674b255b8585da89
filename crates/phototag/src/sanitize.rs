//! Helpers for keeping log output and span attributes short and path-free.

use std::path::Path;

/// Maximum length for response bodies echoed into logs.
const MAX_BODY_LENGTH: usize = 200;

/// Returns only the final component of a path.
///
/// Safe for span fields: names the file or directory without exposing
/// where the archive lives.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Truncates a service response body so an HTML error page or a huge
/// payload cannot flood the log.
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_BODY_LENGTH {
        return body.to_string();
    }

    let mut end = MAX_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &body[..end])
}
