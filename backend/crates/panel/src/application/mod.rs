//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod get_client_expiry;
pub mod send_backup;

pub use config::{BackupConfig, PanelConfig};
pub use get_client_expiry::{GetClientExpiryInput, GetClientExpiryUseCase};
pub use send_backup::SendBackupUseCase;
