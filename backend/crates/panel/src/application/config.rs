//! Application Configuration
//!
//! Configuration for the panel API layer. Values are read from the
//! environment by the binary; the parsing helpers live here so they can be
//! tested next to the types they produce.

use std::num::ParseIntError;
use std::path::PathBuf;

/// Default session cookie name used by the panel frontend
pub const DEFAULT_SESSION_COOKIE: &str = "3x-ui";

/// Panel API configuration
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Web base path, normalised to `/` or `/segment[/segment...]`
    pub base_path: String,
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            session_cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            session_secret: [0u8; 32],
        }
    }
}

impl PanelConfig {
    /// Create config with a random session secret
    pub fn with_random_secret() -> Self {
        Self {
            session_secret: platform::crypto::random_key(),
            ..Default::default()
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Set the base path, normalising it
    pub fn with_base_path(mut self, raw: &str) -> Self {
        self.base_path = normalize_base_path(raw);
        self
    }
}

/// `""`, `"/"`, `"xui/"`, `"//xui//"` become `"/"` or `"/xui"`
pub fn normalize_base_path(raw: &str) -> String {
    let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Backup delivery configuration
#[derive(Debug, Clone, Default)]
pub struct BackupConfig {
    /// Telegram chat ids of the panel admins
    pub admin_chat_ids: Vec<i64>,
    /// Files attached to every backup (database, xray config, ...)
    pub files: Vec<PathBuf>,
    /// Host name shown in the backup caption
    pub host_label: String,
}

impl BackupConfig {
    /// Parse a comma-separated list of chat ids; blanks are ignored
    pub fn parse_admin_ids(raw: &str) -> Result<Vec<i64>, ParseIntError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<i64>)
            .collect()
    }

    /// Parse a comma-separated list of file paths; blanks are ignored
    pub fn parse_files(raw: &str) -> Vec<PathBuf> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect()
    }
}
