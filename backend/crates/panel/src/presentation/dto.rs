//! API DTOs (Data Transfer Objects)

use serde::Serialize;

use crate::domain::expiry::{ExpiryStatus, ExpirySummary};

/// Query string of GET /panel/api/public/client-expiry
///
/// Parsed leniently from the raw query: the first `uuid` wins, other keys
/// and undecodable bytes never reject the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientExpiryQuery {
    pub uuid: Option<String>,
}

impl ClientExpiryQuery {
    pub fn from_raw(raw: Option<&str>) -> Self {
        let uuid = raw.and_then(|raw| {
            url::form_urlencoded::parse(raw.as_bytes())
                .find(|(key, _)| key == "uuid")
                .map(|(_, value)| value.into_owned())
        });
        Self { uuid }
    }
}

/// Response for GET /panel/api/public/client-expiry
///
/// `expiryDate` and `daysRemaining` are omitted entirely when the client has
/// no expiry configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientExpiryResponse {
    pub uuid: String,
    pub expiry_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    pub expired: bool,
}

impl From<ExpirySummary> for ClientExpiryResponse {
    fn from(summary: ExpirySummary) -> Self {
        let (expiry_date, days_remaining, expired) = match summary.status {
            ExpiryStatus::Unlimited => (None, None, false),
            ExpiryStatus::Scheduled {
                expiry_date,
                days_remaining,
                expired,
            } => (
                expiry_date.map(|date| date.format("%Y-%m-%d").to_string()),
                Some(days_remaining),
                expired,
            ),
        };

        Self {
            uuid: summary.client_id.into_string(),
            expiry_time: summary.expiry_time_ms,
            expiry_date,
            days_remaining,
            expired,
        }
    }
}
