//! Client identifier value object

use std::fmt;

/// Opaque identifier of a single proxy client configuration
///
/// Usually UUID-shaped, but nothing here relies on that: trojan and
/// shadowsocks clients are keyed by their password. Always trimmed and
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Trim and validate a raw identifier
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Resolve from the request: the path segment wins, the query is the fallback
    pub fn resolve(path: Option<&str>, query: Option<&str>) -> Option<Self> {
        path.and_then(Self::parse)
            .or_else(|| query.and_then(Self::parse))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
