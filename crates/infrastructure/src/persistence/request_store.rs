//! SQLite request history
//!
//! Implements the `RequestHistoryPort` on the `user_requests`,
//! `region_case_data` and `visit_results` tables. Rows are only ever
//! inserted.

use std::sync::Arc;

use application::{
    ApplicationError, MatchKind, VisitResultEntry,
    ports::{RequestHistoryPort, StoredRequest},
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use domain::{GeoLocation, RegionCaseData, VISIT_DATETIME_FORMAT, VenueId, VisitRequest};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;
use super::error::{map_db_error, map_join_error};

/// SQLite-based request history
#[derive(Debug, Clone)]
pub struct SqliteRequestStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteRequestStore {
    /// Create a new request store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

fn conversion_error(
    column: usize,
    e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e))
}

fn to_i64(value: u64) -> Result<i64, ApplicationError> {
    i64::try_from(value)
        .map_err(|_| ApplicationError::Persistence(format!("value {value} out of range")))
}

fn row_to_request(row: &Row<'_>) -> Result<(i64, VisitRequest, DateTime<Utc>), rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let location = GeoLocation::new(row.get(1)?, row.get(2)?).map_err(|e| conversion_error(1, e))?;
    let query: String = row.get(3)?;
    let radius: u32 = row.get(4)?;
    let visit_at: String = row.get(5)?;
    let visit_at = NaiveDateTime::parse_from_str(&visit_at, VISIT_DATETIME_FORMAT)
        .map_err(|e| conversion_error(5, e))?;
    let limit: u16 = row.get(6)?;
    let created_at: String = row.get(7)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| conversion_error(7, e))?
        .with_timezone(&Utc);

    let request = VisitRequest::new(location, query, radius, visit_at, limit)
        .map_err(|e| conversion_error(3, e))?;

    Ok((id, request, created_at))
}

fn row_to_case_data(row: &Row<'_>) -> Result<RegionCaseData, rusqlite::Error> {
    let cases: i64 = row.get(2)?;
    let deaths: i64 = row.get(3)?;
    Ok(RegionCaseData {
        region_name: row.get(0)?,
        county: row.get(1)?,
        cases: u64::try_from(cases).unwrap_or_default(),
        deaths: u64::try_from(deaths).unwrap_or_default(),
        cases_7_days_per_100k: row.get(4)?,
    })
}

fn row_to_result(row: &Row<'_>) -> Result<VisitResultEntry, rusqlite::Error> {
    let venue_id: String = row.get(0)?;
    let kind: String = row.get(2)?;
    Ok(VisitResultEntry {
        venue_id: VenueId::new(venue_id).map_err(|e| conversion_error(0, e))?,
        venue_name: row.get(1)?,
        kind: MatchKind::parse(&kind).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                format!("unknown result kind {kind}").into(),
            )
        })?,
    })
}

/// Case data and results attached to one request
fn load_attachments(
    conn: &Connection,
    request_id: i64,
) -> Result<(Option<RegionCaseData>, Vec<VisitResultEntry>), rusqlite::Error> {
    let case_data = conn
        .query_row(
            "SELECT region_name, county, cases, deaths, cases7_per_100k
             FROM region_case_data WHERE request_id = ?1",
            [request_id],
            row_to_case_data,
        )
        .optional()?;

    let mut stmt = conn.prepare(
        "SELECT venue_id, venue_name, kind FROM visit_results
         WHERE request_id = ?1 ORDER BY id",
    )?;
    let results = stmt
        .query_map([request_id], row_to_result)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok((case_data, results))
}

#[async_trait]
impl RequestHistoryPort for SqliteRequestStore {
    #[instrument(skip(self, request), fields(query = %request.query()))]
    async fn record_request(&self, request: &VisitRequest) -> Result<i64, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let request = request.clone();
        let now = Utc::now().to_rfc3339();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;
            conn.execute(
                "INSERT INTO user_requests (latitude, longitude, search_input, search_radius,
                    visit_datetime, result_limit, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    request.location().latitude(),
                    request.location().longitude(),
                    request.query(),
                    request.radius_m(),
                    request.visit_at().format(VISIT_DATETIME_FORMAT).to_string(),
                    request.limit(),
                    now,
                ],
            )
            .map_err(map_db_error)?;

            let id = conn.last_insert_rowid();
            debug!(request_id = id, "Recorded request");
            Ok(id)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, data), fields(region = %data.region_name))]
    async fn record_case_data(
        &self,
        request_id: i64,
        data: &RegionCaseData,
    ) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let data = data.clone();
        let cases = to_i64(data.cases)?;
        let deaths = to_i64(data.deaths)?;

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;
            conn.execute(
                "INSERT INTO region_case_data (request_id, region_name, county, cases, deaths,
                    cases7_per_100k)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    request_id,
                    data.region_name,
                    data.county,
                    cases,
                    deaths,
                    data.cases_7_days_per_100k,
                ],
            )
            .map_err(map_db_error)?;

            debug!(request_id, "Recorded case data");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, results), fields(count = results.len()))]
    async fn record_results(
        &self,
        request_id: i64,
        results: &[VisitResultEntry],
    ) -> Result<(), ApplicationError> {
        if results.is_empty() {
            return Ok(());
        }

        let pool = Arc::clone(&self.pool);
        let results = results.to_vec();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(map_db_error)?;
            let tx = conn.transaction().map_err(map_db_error)?;
            {
                let mut stmt = tx
                    .prepare(
                        "INSERT INTO visit_results (request_id, venue_id, venue_name, kind)
                         VALUES (?1, ?2, ?3, ?4)",
                    )
                    .map_err(map_db_error)?;
                for entry in &results {
                    stmt.execute(params![
                        request_id,
                        entry.venue_id.as_str(),
                        entry.venue_name,
                        entry.kind.as_str(),
                    ])
                    .map_err(map_db_error)?;
                }
            }
            tx.commit().map_err(map_db_error)?;

            debug!(request_id, count = results.len(), "Recorded results");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn recent_requests(&self, limit: usize) -> Result<Vec<StoredRequest>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_db_error)?;
            let requests = {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, latitude, longitude, search_input, search_radius,
                            visit_datetime, result_limit, created_at
                         FROM user_requests ORDER BY id DESC LIMIT ?1",
                    )
                    .map_err(map_db_error)?;
                stmt.query_map([limit], row_to_request)
                    .map_err(map_db_error)?
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(map_db_error)?
            };

            let stored = requests
                .into_iter()
                .map(|(id, request, created_at)| {
                    let (case_data, results) = load_attachments(&conn, id)?;
                    Ok(StoredRequest {
                        id,
                        request,
                        created_at,
                        case_data,
                        results,
                    })
                })
                .collect::<Result<Vec<_>, rusqlite::Error>>()
                .map_err(map_db_error)?;

            debug!(count = stored.len(), "Loaded request history");
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::persistence::create_pool;

    fn store() -> SqliteRequestStore {
        SqliteRequestStore::new(Arc::new(create_pool(&DatabaseConfig::in_memory()).unwrap()))
    }

    fn request() -> VisitRequest {
        VisitRequest::from_raw(52.52, 13.405, "coffee", 1500, "2021-03-01 13:30:00", 50).unwrap()
    }

    #[tokio::test]
    async fn request_round_trips_through_history() {
        let store = store();
        let id = store.record_request(&request()).await.unwrap();

        let history = store.recent_requests(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, id);
        assert_eq!(history[0].request, request());
        assert!(history[0].case_data.is_none());
        assert!(history[0].results.is_empty());
    }

    #[tokio::test]
    async fn empty_results_are_a_no_op() {
        let store = store();
        let id = store.record_request(&request()).await.unwrap();
        store.record_results(id, &[]).await.unwrap();
    }

    #[tokio::test]
    async fn case_data_for_unknown_request_fails() {
        let store = store();
        let data = RegionCaseData {
            region_name: "Berlin Mitte".to_string(),
            county: "SK Berlin Mitte".to_string(),
            cases: 1,
            deaths: 0,
            cases_7_days_per_100k: 1.0,
        };
        let err = store.record_case_data(999, &data).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Persistence(_)));
    }

    #[tokio::test]
    async fn corrupt_created_at_is_an_error() {
        let store = store();
        let id = store.record_request(&request()).await.unwrap();
        {
            let conn = store.pool.get().unwrap();
            conn.execute(
                "UPDATE user_requests SET created_at = 'yesterday' WHERE id = ?1",
                [id],
            )
            .unwrap();
        }

        let err = store.recent_requests(10).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Persistence(_)));
    }
}
