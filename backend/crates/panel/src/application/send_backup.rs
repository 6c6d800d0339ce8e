//! Send Backup Use Case

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::domain::repository::BackupNotifier;

/// Send Backup Use Case
///
/// Delivery is detached from the caller: the HTTP response never waits for
/// it and its outcome is only logged.
pub struct SendBackupUseCase<N>
where
    N: BackupNotifier + Sync + 'static,
{
    notifier: Arc<N>,
}

impl<N> SendBackupUseCase<N>
where
    N: BackupNotifier + Sync + 'static,
{
    pub fn new(notifier: Arc<N>) -> Self {
        Self { notifier }
    }

    /// Spawn delivery on the runtime; the handle may be dropped
    pub fn dispatch(&self) -> JoinHandle<()> {
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            match notifier.send_backup_to_admins().await {
                Ok(()) => tracing::info!("Backup delivered to admins"),
                Err(e) => tracing::warn!(error = %e, "Backup delivery to admins failed"),
            }
        })
    }
}
