//! Partition reads against the PostgreSQL store.

use std::future::Future;
use std::time::Duration;

use futures::TryStreamExt;
use sqlx::postgres::PgRow;
use sqlx::{Connection, PgPool};
use tracing::debug;

use crate::partition::PartitionId;

use super::records::{FlexibleRecord, Observation, DATE_ONLY_COLUMN, OBSERVATION_COLUMNS};
use super::FetchError;

/// Reads whole daily partitions, ordered by their date column.
///
/// Stateless beyond the shared pool; one fetcher serves every request.
#[derive(Debug, Clone)]
pub struct PartitionFetcher {
    pool: PgPool,
    /// Deadline covering the whole acquire/ping/query/iterate sequence.
    query_timeout: Duration,
}

impl PartitionFetcher {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        PartitionFetcher {
            pool,
            query_timeout,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Schema-fixed read: the 35 known columns, decoded positionally.
    pub async fn fetch_typed(
        &self,
        partition: &PartitionId,
    ) -> Result<Vec<Observation>, FetchError> {
        let sql = typed_query(partition);
        self.with_deadline(self.run(&sql, Observation::from_row))
            .await
    }

    /// Schema-flexible read: columns discovered from result metadata.
    pub async fn fetch_flexible(
        &self,
        partition: &PartitionId,
    ) -> Result<Vec<FlexibleRecord>, FetchError> {
        let sql = flexible_query(partition);
        self.with_deadline(self.run(&sql, FlexibleRecord::from_row))
            .await
    }

    /// Borrow a connection, verify it is alive, stream the rows and
    /// decode each one. The pooled connection is released by drop on
    /// every exit path, the deadline-cancelled one included.
    async fn run<T>(
        &self,
        sql: &str,
        decode: fn(&PgRow) -> Result<T, sqlx::Error>,
    ) -> Result<Vec<T>, FetchError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| FetchError::ConnectFailed(e.to_string()))?;

        conn.ping()
            .await
            .map_err(|e| FetchError::PingFailed(e.to_string()))?;

        debug!(query = sql, "Executing partition read");

        let mut records = Vec::new();
        let mut stream = sqlx::query(sql).fetch(&mut *conn);
        loop {
            match stream.try_next().await {
                Ok(Some(row)) => {
                    let record =
                        decode(&row).map_err(|e| FetchError::ScanFailed(e.to_string()))?;
                    records.push(record);
                }
                Ok(None) => break,
                Err(e) => return Err(FetchError::from_stream(e, !records.is_empty())),
            }
        }

        Ok(records)
    }

    async fn with_deadline<T>(
        &self,
        read: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        match tokio::time::timeout(self.query_timeout, read).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.query_timeout)),
        }
    }
}

// The partition name is spliced into the query text as an identifier.
// That is safe only because PartitionId values come from the resolver
// or the demo constant, never from raw request input.

fn typed_query(partition: &PartitionId) -> String {
    let columns = OBSERVATION_COLUMNS
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!(r#"SELECT {columns} FROM "{partition}" ORDER BY "{DATE_ONLY_COLUMN}""#)
}

fn flexible_query(partition: &PartitionId) -> String {
    format!(r#"SELECT * FROM "{partition}" ORDER BY "{DATE_ONLY_COLUMN}""#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flexible_query_orders_by_date() {
        assert_eq!(
            flexible_query(&PartitionId::demo()),
            r#"SELECT * FROM "june212025" ORDER BY "date_only""#
        );
    }

    #[test]
    fn typed_query_selects_all_columns_in_order() {
        let sql = typed_query(&PartitionId::demo());
        assert!(sql.starts_with(r#"SELECT "gbifID", "datasetKey""#));
        assert!(sql.ends_with(r#"FROM "june212025" ORDER BY "date_only""#));
        for column in OBSERVATION_COLUMNS {
            assert!(sql.contains(&format!("\"{column}\"")), "missing {column}");
        }
        // Positional binding: column order in the SQL is exactly the
        // array order.
        let mut last = 0;
        for column in OBSERVATION_COLUMNS {
            let pos = sql[last..]
                .find(&format!("\"{column}\""))
                .expect("column out of order");
            last += pos + 1;
        }
    }
}
