//! Client expiry computation

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::client_id::ClientId;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Expiry state derived from the raw timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    /// `expiryTime <= 0`: no expiry configured, never expires
    Unlimited,
    /// A concrete expiry instant is configured
    Scheduled {
        /// UTC calendar date; `None` if the instant is outside chrono's range
        expiry_date: Option<NaiveDate>,
        /// `ceil(remaining / 1 day)`, negative once expired
        days_remaining: i64,
        expired: bool,
    },
}

/// Read-only expiry view for one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirySummary {
    pub client_id: ClientId,
    /// Raw epoch milliseconds as stored upstream
    pub expiry_time_ms: i64,
    pub status: ExpiryStatus,
}

impl ExpirySummary {
    /// Build the summary relative to `now_ms`
    pub fn compute(client_id: ClientId, expiry_time_ms: i64, now_ms: i64) -> Self {
        let status = if expiry_time_ms > 0 {
            let remaining_ms = expiry_time_ms.saturating_sub(now_ms);
            ExpiryStatus::Scheduled {
                expiry_date: DateTime::<Utc>::from_timestamp_millis(expiry_time_ms)
                    .map(|instant| instant.date_naive()),
                days_remaining: ceil_days(remaining_ms),
                expired: remaining_ms <= 0,
            }
        } else {
            ExpiryStatus::Unlimited
        };

        Self {
            client_id,
            expiry_time_ms,
            status,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.status, ExpiryStatus::Scheduled { expired: true, .. })
    }
}

/// Ceiling division by one day, correct for negative values
fn ceil_days(ms: i64) -> i64 {
    -ms.saturating_neg().div_euclid(MILLIS_PER_DAY)
}
