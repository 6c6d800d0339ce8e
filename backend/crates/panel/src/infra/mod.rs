//! Infrastructure Layer
//!
//! Adapters for the domain ports.

pub mod postgres;
pub mod session_cookie;
pub mod telegram;
