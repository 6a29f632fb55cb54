//! SQLite credential store
//!
//! Implements the `CredentialStorePort` on the append-only
//! `api_credentials` table.

use std::sync::Arc;

use application::{ApplicationError, ports::CredentialStorePort};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::ApiCredential;
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;
use super::error::{map_db_error, map_join_error};

/// SQLite-based credential store
#[derive(Debug, Clone)]
pub struct SqliteCredentialStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteCredentialStore {
    /// Create a new credential store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

fn row_to_credential(row: &Row<'_>) -> Result<ApiCredential, rusqlite::Error> {
    let created_at: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    Ok(ApiCredential::restore(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        created_at,
    ))
}

#[async_trait]
impl CredentialStorePort for SqliteCredentialStore {
    #[instrument(skip(self, credential), fields(provider = %credential.provider()))]
    async fn add_credential(&self, credential: &ApiCredential) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let credential = credential.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;
            conn.execute(
                "INSERT INTO api_credentials (provider, api_key, client_id, client_secret, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    credential.provider(),
                    credential.api_key(),
                    credential.client_id(),
                    credential.client_secret(),
                    credential.created_at().to_rfc3339(),
                ],
            )
            .map_err(map_db_error)?;

            debug!("Stored credential");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn latest_credential(
        &self,
        provider: &str,
    ) -> Result<Option<ApiCredential>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let provider = provider.trim().to_lowercase();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;
            let credential = conn
                .query_row(
                    "SELECT provider, api_key, client_id, client_secret, created_at
                     FROM api_credentials WHERE provider = ?1
                     ORDER BY id DESC LIMIT 1",
                    [&provider],
                    row_to_credential,
                )
                .optional()
                .map_err(map_db_error)?;

            debug!(found = credential.is_some(), "Looked up credential");
            Ok(credential)
        })
        .await
        .map_err(map_join_error)?
    }
}
