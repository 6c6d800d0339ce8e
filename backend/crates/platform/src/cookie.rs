//! Cookie parsing
//!
//! Only reading is needed here: session cookies are issued by the login
//! subsystem.

use axum::http::{HeaderMap, header};

/// Extract a cookie value from headers
///
/// Looks at every `Cookie` header (HTTP/2 clients may split them) and
/// returns the first pair whose name matches exactly.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.trim_matches('"').to_string())
        })
}
