//! Presentation Layer
//!
//! HTTP handlers, DTOs, auth gate and router.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::PanelAppState;
pub use middleware::{AuthGateState, require_panel_session};
pub use router::{ProtectedRoutes, panel_router, panel_router_generic};
