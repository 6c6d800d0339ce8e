//! Panel Router
//!
//! Route table, built once at startup:
//!
//! ```text
//! {base}/panel/api/public/client-expiry          GET   public
//! {base}/panel/api/public/client-expiry/         GET   public, same as above
//! {base}/panel/api/public/client-expiry/{uuid}   GET   public
//! {base}/panel/api/backuptotgbot                 GET   gated
//! {base}/panel/api/inbounds/...                  *     gated, caller-supplied
//! {base}/panel/api/server/...                    *     gated, caller-supplied
//! ```

use std::sync::Arc;

use axum::{Router, middleware, routing::get};

use crate::application::config::PanelConfig;
use crate::domain::repository::{BackupNotifier, ClientExpiryRepository, SessionOracle};
use crate::infra::postgres::PgClientExpiryRepository;
use crate::infra::session_cookie::SignedCookieSessionOracle;
use crate::infra::telegram::TelegramBackupNotifier;
use crate::presentation::handlers::{self, PanelAppState};
use crate::presentation::middleware::{AuthGateState, require_panel_session};

/// Management sub-routers mounted behind the auth gate
///
/// Inbound and server management are owned elsewhere; their routers are
/// mounted as given, with paths relative to their prefix.
#[derive(Default)]
pub struct ProtectedRoutes {
    /// Mounted at `/panel/api/inbounds`
    pub inbounds: Router,
    /// Mounted at `/panel/api/server`
    pub server: Router,
}

/// Create the panel router with the PostgreSQL, Telegram and cookie adapters
pub fn panel_router(
    repo: PgClientExpiryRepository,
    notifier: TelegramBackupNotifier,
    config: PanelConfig,
    protected: ProtectedRoutes,
) -> Router {
    let config = Arc::new(config);
    let oracle = SignedCookieSessionOracle::new(config.clone());

    panel_router_generic(repo, notifier, oracle, &config.base_path, protected)
}

/// Create a generic panel router for any port implementations
pub fn panel_router_generic<R, N, O>(
    repo: R,
    notifier: N,
    oracle: O,
    base_path: &str,
    protected: ProtectedRoutes,
) -> Router
where
    R: ClientExpiryRepository + Sync + 'static,
    N: BackupNotifier + Sync + 'static,
    O: SessionOracle + Sync + 'static,
{
    let state = PanelAppState {
        repo: Arc::new(repo),
        notifier: Arc::new(notifier),
    };
    let gate = AuthGateState {
        oracle: Arc::new(oracle),
    };

    let public = Router::new()
        .route(
            "/client-expiry",
            get(handlers::client_expiry_by_query::<R, N>),
        )
        .route(
            "/client-expiry/",
            get(handlers::client_expiry_by_query::<R, N>),
        )
        .route(
            "/client-expiry/{uuid}",
            get(handlers::client_expiry_by_path::<R, N>),
        )
        .with_state(state.clone());

    let api = Router::new()
        .route("/backuptotgbot", get(handlers::backup_to_tgbot::<R, N>))
        .with_state(state)
        .nest("/inbounds", protected.inbounds)
        .nest("/server", protected.server)
        .route_layer(middleware::from_fn_with_state(
            gate,
            require_panel_session::<O>,
        ));

    let panel = Router::new()
        .nest("/panel/api/public", public)
        .nest("/panel/api", api);

    mount(base_path, panel)
}

/// Nest under the base path; the root is a plain passthrough
fn mount(base_path: &str, router: Router) -> Router {
    let base_path = crate::application::config::normalize_base_path(base_path);
    if base_path == "/" {
        router
    } else {
        Router::new().nest(&base_path, router)
    }
}
