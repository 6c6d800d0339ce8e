//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Value objects (ClientId)
//! - Expiry computation (ExpirySummary)
//! - Domain services (session token signing)
//! - Repository and collaborator traits (ports)

pub mod client_id;
pub mod expiry;
pub mod repository;
pub mod services;
