//! Get Client Expiry Use Case

use std::sync::Arc;

use chrono::Utc;

use crate::domain::client_id::ClientId;
use crate::domain::expiry::ExpirySummary;
use crate::domain::repository::ClientExpiryRepository;
use crate::error::{PanelError, PanelResult};

/// Raw identifier candidates taken from the request
#[derive(Debug, Clone, Default)]
pub struct GetClientExpiryInput {
    pub path_uuid: Option<String>,
    pub query_uuid: Option<String>,
}

/// Get Client Expiry Use Case
pub struct GetClientExpiryUseCase<R>
where
    R: ClientExpiryRepository,
{
    expiry_repo: Arc<R>,
}

impl<R> GetClientExpiryUseCase<R>
where
    R: ClientExpiryRepository,
{
    pub fn new(expiry_repo: Arc<R>) -> Self {
        Self { expiry_repo }
    }

    pub async fn execute(&self, input: GetClientExpiryInput) -> PanelResult<ExpirySummary> {
        self.execute_at(input, Utc::now().timestamp_millis()).await
    }

    /// Same as [`execute`](Self::execute) with an explicit clock
    pub async fn execute_at(
        &self,
        input: GetClientExpiryInput,
        now_ms: i64,
    ) -> PanelResult<ExpirySummary> {
        let client_id = ClientId::resolve(input.path_uuid.as_deref(), input.query_uuid.as_deref())
            .ok_or(PanelError::ClientIdRequired)?;

        let expiry_time_ms = self
            .expiry_repo
            .find_expiry(&client_id)
            .await
            .map_err(|e| PanelError::ExpiryQueryFailed(Box::new(e)))?
            .ok_or(PanelError::ClientNotFound)?;

        tracing::debug!(client_id = %client_id, expiry_time_ms, "Client expiry resolved");

        Ok(ExpirySummary::compute(client_id, expiry_time_ms, now_ms))
    }
}
