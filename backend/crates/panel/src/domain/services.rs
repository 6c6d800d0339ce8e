//! Domain Services - session token signing
//!
//! A panel session token is stateless:
//!
//! ```text
//! base64url( session_id[16] || expires_at_ms[8, BE] || HMAC-SHA256(secret, first 24 bytes)[32] )
//! ```

use hmac::{Hmac, Mac};
use platform::crypto::{from_base64_url, to_base64_url};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const CLAIMS_LEN: usize = 16 + 8;
const TOKEN_LEN: usize = CLAIMS_LEN + 32;

/// Data carried by a session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClaims {
    pub session_id: Uuid,
    pub expires_at_ms: i64,
}

impl SessionClaims {
    /// Fresh session valid for `ttl_ms` from `now_ms`
    pub fn new(now_ms: i64, ttl_ms: i64) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            expires_at_ms: now_ms.saturating_add(ttl_ms),
        }
    }

    fn to_bytes(self) -> [u8; CLAIMS_LEN] {
        let mut bytes = [0u8; CLAIMS_LEN];
        bytes[..16].copy_from_slice(self.session_id.as_bytes());
        bytes[16..].copy_from_slice(&self.expires_at_ms.to_be_bytes());
        bytes
    }
}

fn session_mac(secret: &[u8; 32], payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload);
    mac
}

/// Sign claims into a cookie-safe token
pub fn issue_session_token(secret: &[u8; 32], claims: SessionClaims) -> String {
    let payload = claims.to_bytes();
    let signature = session_mac(secret, &payload).finalize().into_bytes();

    let mut token = Vec::with_capacity(TOKEN_LEN);
    token.extend_from_slice(&payload);
    token.extend_from_slice(&signature);
    to_base64_url(&token)
}

/// Verify signature and expiry; `None` for anything invalid
pub fn verify_session_token(token: &str, secret: &[u8; 32], now_ms: i64) -> Option<SessionClaims> {
    let data = from_base64_url(token).ok()?;
    if data.len() != TOKEN_LEN {
        return None;
    }

    let (payload, provided_signature) = data.split_at(CLAIMS_LEN);
    session_mac(secret, payload)
        .verify_slice(provided_signature)
        .ok()?;

    let session_id = Uuid::from_slice(&payload[..16]).ok()?;
    let expires_at_ms = i64::from_be_bytes(payload[16..].try_into().ok()?);
    if expires_at_ms <= now_ms {
        return None;
    }

    Some(SessionClaims {
        session_id,
        expires_at_ms,
    })
}
