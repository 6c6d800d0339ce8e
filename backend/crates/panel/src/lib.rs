//! Panel API Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Client identifiers, expiry computation, session tokens, ports
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL, Telegram and cookie-session adapters
//! - `presentation/` - HTTP handlers, DTOs, auth gate, router
//!
//! ## Security Model
//! - Every management route sits behind the auth gate
//! - Unauthenticated requests to gated routes get a bare 404, never 401/403,
//!   so protected and nonexistent paths look the same from outside
//! - The client-expiry lookup is public and read-only
//! - Upstream failures are reported with generic messages; details stay in logs

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{BackupConfig, PanelConfig};
pub use error::{PanelError, PanelResult};
pub use infra::postgres::PgClientExpiryRepository;
pub use infra::session_cookie::SignedCookieSessionOracle;
pub use infra::telegram::TelegramBackupNotifier;
pub use presentation::router::{ProtectedRoutes, panel_router, panel_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::AppError,
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::client_id::*;
    pub use crate::domain::expiry::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
