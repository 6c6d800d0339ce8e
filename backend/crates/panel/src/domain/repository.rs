//! Repository and collaborator traits
//!
//! Ports to everything this crate does not own. Implementations live in
//! the infrastructure layer; tests supply in-memory fakes.

use axum::http::HeaderMap;

use crate::domain::client_id::ClientId;
use crate::error::PanelResult;

/// Expiry resolver backed by the inbound configuration store
#[trait_variant::make(ClientExpiryRepository: Send)]
pub trait LocalClientExpiryRepository {
    /// Expiry of the client in epoch milliseconds
    ///
    /// `Ok(None)` means the identifier is unknown; `Ok(Some(0))` means the
    /// client exists but has no expiry configured.
    async fn find_expiry(&self, client_id: &ClientId) -> PanelResult<Option<i64>>;
}

/// Backup delivery to the panel admins
#[trait_variant::make(BackupNotifier: Send)]
pub trait LocalBackupNotifier {
    async fn send_backup_to_admins(&self) -> PanelResult<()>;
}

/// Answers whether a request carries a valid panel session
#[trait_variant::make(SessionOracle: Send)]
pub trait LocalSessionOracle {
    async fn is_authenticated(&self, headers: &HeaderMap) -> bool;
}
