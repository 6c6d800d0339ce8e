//! HTTP Handlers

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::Response;
use kernel::response::json_obj;

use crate::application::{GetClientExpiryInput, GetClientExpiryUseCase, SendBackupUseCase};
use crate::domain::repository::{BackupNotifier, ClientExpiryRepository};
use crate::error::PanelResult;
use crate::presentation::dto::{ClientExpiryQuery, ClientExpiryResponse};

/// Shared state for panel handlers
pub struct PanelAppState<R, N>
where
    R: ClientExpiryRepository + Sync + 'static,
    N: BackupNotifier + Sync + 'static,
{
    pub repo: Arc<R>,
    pub notifier: Arc<N>,
}

impl<R, N> Clone for PanelAppState<R, N>
where
    R: ClientExpiryRepository + Sync + 'static,
    N: BackupNotifier + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

// ============================================================================
// Public: client expiry
// ============================================================================

/// GET /panel/api/public/client-expiry?uuid=
pub async fn client_expiry_by_query<R, N>(
    State(state): State<PanelAppState<R, N>>,
    RawQuery(query): RawQuery,
) -> PanelResult<Response>
where
    R: ClientExpiryRepository + Sync + 'static,
    N: BackupNotifier + Sync + 'static,
{
    client_expiry(&state, None, query.as_deref()).await
}

/// GET /panel/api/public/client-expiry/{uuid}
///
/// A path segment that does not decode counts as absent, so the query
/// fallback still applies.
pub async fn client_expiry_by_path<R, N>(
    State(state): State<PanelAppState<R, N>>,
    path: Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
) -> PanelResult<Response>
where
    R: ClientExpiryRepository + Sync + 'static,
    N: BackupNotifier + Sync + 'static,
{
    let path_uuid = match path {
        Ok(Path(uuid)) => Some(uuid),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Undecodable client id in path");
            None
        }
    };

    client_expiry(&state, path_uuid, query.as_deref()).await
}

async fn client_expiry<R, N>(
    state: &PanelAppState<R, N>,
    path_uuid: Option<String>,
    raw_query: Option<&str>,
) -> PanelResult<Response>
where
    R: ClientExpiryRepository + Sync + 'static,
    N: BackupNotifier + Sync + 'static,
{
    // the query is only consulted when the path carries no identifier
    let query_uuid = match path_uuid.as_deref().map(str::trim) {
        Some(uuid) if !uuid.is_empty() => None,
        _ => ClientExpiryQuery::from_raw(raw_query).uuid,
    };

    let use_case = GetClientExpiryUseCase::new(state.repo.clone());

    let summary = use_case
        .execute(GetClientExpiryInput {
            path_uuid,
            query_uuid,
        })
        .await?;

    Ok(json_obj(ClientExpiryResponse::from(summary)))
}

// ============================================================================
// Gated: backup relay
// ============================================================================

/// GET /panel/api/backuptotgbot
///
/// Answers immediately; delivery continues in the background.
pub async fn backup_to_tgbot<R, N>(State(state): State<PanelAppState<R, N>>) -> StatusCode
where
    R: ClientExpiryRepository + Sync + 'static,
    N: BackupNotifier + Sync + 'static,
{
    SendBackupUseCase::new(state.notifier.clone()).dispatch();
    StatusCode::OK
}
