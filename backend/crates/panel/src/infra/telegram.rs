//! Telegram backup notifier
//!
//! Sends a short header message followed by every configured backup file to
//! each admin chat. Without a bot client or without admins it does nothing.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::telegram::{TelegramClient, TelegramError};

use crate::application::config::BackupConfig;
use crate::domain::repository::BackupNotifier;
use crate::error::PanelResult;

/// A file loaded for upload
#[derive(Debug, Clone)]
struct BackupFile {
    name: String,
    bytes: Vec<u8>,
}

/// Backup notifier over the Telegram Bot API
#[derive(Debug, Clone)]
pub struct TelegramBackupNotifier {
    client: Option<TelegramClient>,
    config: Arc<BackupConfig>,
}

impl TelegramBackupNotifier {
    pub fn new(client: Option<TelegramClient>, config: BackupConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Notifier that never sends anything
    pub fn disabled() -> Self {
        Self::new(None, BackupConfig::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some() && !self.config.admin_chat_ids.is_empty()
    }

    /// Read every configured file; files that do not exist are skipped
    async fn load_files(&self) -> PanelResult<Vec<BackupFile>> {
        let mut files = Vec::with_capacity(self.config.files.len());
        for path in &self.config.files {
            match tokio::fs::read(path).await {
                Ok(bytes) => files.push(BackupFile {
                    name: file_name(path),
                    bytes,
                }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::warn!(path = %path.display(), "Backup file missing, skipped");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(files)
    }

    async fn send_to(
        client: &TelegramClient,
        chat_id: i64,
        caption: &str,
        files: &[BackupFile],
    ) -> Result<(), TelegramError> {
        client.send_message(chat_id, caption).await?;
        for file in files {
            client
                .send_document(chat_id, &file.name, file.bytes.clone(), None)
                .await?;
        }
        Ok(())
    }
}

impl BackupNotifier for TelegramBackupNotifier {
    async fn send_backup_to_admins(&self) -> PanelResult<()> {
        let Some(client) = &self.client else {
            tracing::debug!("Telegram bot not configured, backup skipped");
            return Ok(());
        };
        if self.config.admin_chat_ids.is_empty() {
            tracing::debug!("No Telegram admins configured, backup skipped");
            return Ok(());
        }

        let files = self.load_files().await?;
        let caption = backup_caption(&self.config.host_label, Utc::now());

        let mut first_error = None;
        for &chat_id in &self.config.admin_chat_ids {
            if let Err(e) = Self::send_to(client, chat_id, &caption, &files).await {
                tracing::warn!(chat_id, error = %e, "Backup delivery to admin failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => {
                tracing::info!(
                    admins = self.config.admin_chat_ids.len(),
                    files = files.len(),
                    "Backup sent to Telegram admins"
                );
                Ok(())
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string())
}

fn backup_caption(host_label: &str, at: DateTime<Utc>) -> String {
    let host = if host_label.is_empty() {
        "panel"
    } else {
        host_label
    };
    format!(
        "Backup of {host}\nTime: {}",
        at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}
