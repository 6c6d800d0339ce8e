//! Auth Gate
//!
//! Guards every management route. A request without a valid session gets a
//! bare `404 Not Found`, the same answer as a path that does not exist, so
//! scanners cannot tell that a protected API lives there.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::domain::repository::SessionOracle;

/// Middleware state
pub struct AuthGateState<O>
where
    O: SessionOracle + Sync + 'static,
{
    pub oracle: Arc<O>,
}

impl<O> Clone for AuthGateState<O>
where
    O: SessionOracle + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            oracle: self.oracle.clone(),
        }
    }
}

/// Middleware that requires a valid panel session
pub async fn require_panel_session<O>(
    State(state): State<AuthGateState<O>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    O: SessionOracle + Sync + 'static,
{
    if !state.oracle.is_authenticated(req.headers()).await {
        tracing::debug!(
            method = %req.method(),
            path = %req.uri().path(),
            "Unauthenticated panel API request answered with 404"
        );
        return StatusCode::NOT_FOUND.into_response();
    }

    next.run(req).await
}
