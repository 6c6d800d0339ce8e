//! Signed-cookie session oracle

use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::Utc;

use crate::application::config::PanelConfig;
use crate::domain::repository::SessionOracle;
use crate::domain::services::verify_session_token;

/// Validates the HMAC-signed session cookie issued at login
#[derive(Debug, Clone)]
pub struct SignedCookieSessionOracle {
    config: Arc<PanelConfig>,
}

impl SignedCookieSessionOracle {
    pub fn new(config: Arc<PanelConfig>) -> Self {
        Self { config }
    }
}

impl SessionOracle for SignedCookieSessionOracle {
    async fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        let Some(token) =
            platform::cookie::extract_cookie(headers, &self.config.session_cookie_name)
        else {
            tracing::debug!("No panel session cookie");
            return false;
        };

        let now_ms = Utc::now().timestamp_millis();
        match verify_session_token(&token, &self.config.session_secret, now_ms) {
            Some(claims) => {
                tracing::trace!(session_id = %claims.session_id, "Panel session accepted");
                true
            }
            None => {
                tracing::debug!("Invalid or expired panel session cookie");
                false
            }
        }
    }
}
