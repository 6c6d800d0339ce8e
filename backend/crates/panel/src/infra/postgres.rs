//! PostgreSQL Repository Implementations
//!
//! The `inbounds` table is owned by the inbound-management service; this
//! crate only reads it. Clients live in the `clients` array of each
//! inbound's `settings` JSON document.

use sqlx::PgPool;

use crate::domain::client_id::ClientId;
use crate::domain::repository::ClientExpiryRepository;
use crate::error::PanelResult;

/// Matches vmess/vless clients by `id` and trojan/shadowsocks clients by
/// `password`. The lowest inbound id wins when several inbounds share a client.
///
/// Rows whose `settings` is not valid JSON, whose `clients` is not an array,
/// or whose client entries are not objects are skipped rather than failing
/// the whole lookup. A non-numeric `expiryTime` reads as absent.
/// `pg_input_is_valid` needs PostgreSQL 16 or newer.
const FIND_CLIENT_EXPIRY_SQL: &str = r#"
    SELECT CASE
               WHEN jsonb_typeof(client -> 'expiryTime') = 'number'
               THEN (client ->> 'expiryTime')::NUMERIC::BIGINT
           END AS expiry_time
    FROM (
        SELECT id,
               CASE
                   WHEN pg_input_is_valid(settings::TEXT, 'jsonb')
                   THEN settings::TEXT::JSONB
               END AS doc
        FROM inbounds
    ) AS parsed
    CROSS JOIN LATERAL jsonb_array_elements(
        CASE
            WHEN jsonb_typeof(parsed.doc -> 'clients') = 'array'
            THEN parsed.doc -> 'clients'
            ELSE '[]'::JSONB
        END
    ) AS client
    WHERE jsonb_typeof(client) = 'object'
      AND (client ->> 'id' = $1 OR client ->> 'password' = $1)
    ORDER BY parsed.id
    LIMIT 1
"#;

/// PostgreSQL-backed expiry resolver
#[derive(Clone)]
pub struct PgClientExpiryRepository {
    pool: PgPool,
}

impl PgClientExpiryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ClientExpiryRepository for PgClientExpiryRepository {
    async fn find_expiry(&self, client_id: &ClientId) -> PanelResult<Option<i64>> {
        // outer Option: row found; inner Option: expiryTime present
        let row = sqlx::query_scalar::<_, Option<i64>>(FIND_CLIENT_EXPIRY_SQL)
            .bind(client_id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(expiry_time) => Ok(Some(expiry_time.unwrap_or(0))),
            None => {
                tracing::debug!(client_id = %client_id, "Client not found in any inbound");
                Ok(None)
            }
        }
    }
}
