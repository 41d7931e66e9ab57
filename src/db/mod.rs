//! Database access for the inventory table.
//!
//! The backend sits behind the `InventoryDb`/`InventoryConn` trait pair so the
//! HTTP layer never touches a driver type directly and tests can substitute an
//! in-memory backend. Each request opens its own connection and closes it on
//! every exit path; there is no pooling and no state shared between requests.

pub mod postgres;
pub mod record;

pub use postgres::PgInventoryDb;
pub use record::{Record, Value};

use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Any error surfaced by the driver while connecting, querying, or decoding.
    #[error("{0}")]
    Driver(#[from] sqlx::Error),

    /// Backend-reported failure that did not originate in the sqlx driver.
    #[error("{0}")]
    Backend(String),
}

/// A count session submitted by the mobile client.
///
/// Field names are camelCase on the wire to match the client's payloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountSession {
    pub id: Option<String>,
    pub location_id: Option<String>,
    #[serde(default)]
    pub items: Vec<CountItem>,
}

/// One counted item within a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountItem {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub quantity: i32,
    pub timestamp: Option<String>,
}

/// Factory for per-request connections.
#[async_trait]
pub trait InventoryDb: Send + Sync {
    /// Opens a fresh connection, owned exclusively by the calling request.
    async fn open(&self) -> Result<Box<dyn InventoryConn>, DbError>;
}

/// A single open connection to the inventory database.
#[async_trait]
pub trait InventoryConn: Send {
    /// Fetches every row and column of the designated inventory table,
    /// preserving the result set's column order in each record.
    async fn list_items(&mut self) -> Result<Vec<Record>, DbError>;

    /// Inserts one row per counted item. Returns the number of rows inserted.
    async fn insert_counts(&mut self, session: &CountSession) -> Result<u64, DbError>;

    /// Releases the connection.
    async fn close(self: Box<Self>) -> Result<(), DbError>;
}

/// Lists the inventory table on a scoped connection.
///
/// The connection is closed before this returns, whether the query succeeded
/// or not, and a close failure never replaces the query's result.
pub async fn fetch_items(db: &dyn InventoryDb) -> Result<Vec<Record>, DbError> {
    let mut conn = db.open().await?;
    let result = conn.list_items().await;
    close_quietly(conn).await;
    result
}

/// Writes a count session on a scoped connection, same lifecycle as `fetch_items`.
pub async fn record_counts(db: &dyn InventoryDb, session: &CountSession) -> Result<u64, DbError> {
    let mut conn = db.open().await?;
    let result = conn.insert_counts(session).await;
    close_quietly(conn).await;
    result
}

/// Closes the connection, logging and discarding any release-phase error so it
/// cannot mask the primary result already in hand.
async fn close_quietly(conn: Box<dyn InventoryConn>) {
    if let Err(err) = conn.close().await {
        tracing::warn!(error = %err, "failed to close database connection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts open/close calls and fails on demand.
    struct CountingDb {
        opened: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
        fail_open: bool,
        fail_query: bool,
        fail_close: bool,
    }

    impl CountingDb {
        fn new() -> Self {
            Self {
                opened: Arc::new(AtomicUsize::new(0)),
                closed: Arc::new(AtomicUsize::new(0)),
                fail_open: false,
                fail_query: false,
                fail_close: false,
            }
        }
    }

    struct CountingConn {
        closed: Arc<AtomicUsize>,
        fail_query: bool,
        fail_close: bool,
    }

    #[async_trait]
    impl InventoryDb for CountingDb {
        async fn open(&self) -> Result<Box<dyn InventoryConn>, DbError> {
            if self.fail_open {
                return Err(DbError::Backend("connection refused".to_string()));
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingConn {
                closed: self.closed.clone(),
                fail_query: self.fail_query,
                fail_close: self.fail_close,
            }))
        }
    }

    #[async_trait]
    impl InventoryConn for CountingConn {
        async fn list_items(&mut self) -> Result<Vec<Record>, DbError> {
            if self.fail_query {
                return Err(DbError::Backend("relation does not exist".to_string()));
            }
            let mut record = Record::new();
            record.push("sku", Value::from("A-100"));
            Ok(vec![record])
        }

        async fn insert_counts(&mut self, session: &CountSession) -> Result<u64, DbError> {
            if self.fail_query {
                return Err(DbError::Backend("insert failed".to_string()));
            }
            Ok(session.items.len() as u64)
        }

        async fn close(self: Box<Self>) -> Result<(), DbError> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                return Err(DbError::Backend("close failed".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn fetch_closes_exactly_once_on_success() {
        let db = CountingDb::new();
        let items = fetch_items(&db).await.expect("fetch should succeed");
        assert_eq!(items.len(), 1);
        assert_eq!(db.opened.load(Ordering::SeqCst), 1);
        assert_eq!(db.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fetch_closes_exactly_once_on_query_failure() {
        let db = CountingDb {
            fail_query: true,
            ..CountingDb::new()
        };
        let err = fetch_items(&db).await.expect_err("query should fail");
        assert!(err.to_string().contains("relation does not exist"));
        assert_eq!(db.opened.load(Ordering::SeqCst), 1);
        assert_eq!(db.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn open_failure_opens_nothing() {
        let db = CountingDb {
            fail_open: true,
            ..CountingDb::new()
        };
        fetch_items(&db).await.expect_err("open should fail");
        assert_eq!(db.opened.load(Ordering::SeqCst), 0);
        assert_eq!(db.closed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn close_failure_does_not_mask_rows() {
        let db = CountingDb {
            fail_close: true,
            ..CountingDb::new()
        };
        let items = fetch_items(&db).await.expect("close failure must be suppressed");
        assert_eq!(items.len(), 1);
        assert_eq!(db.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn record_counts_closes_exactly_once() {
        let db = CountingDb::new();
        let session = CountSession {
            id: Some("s-1".to_string()),
            location_id: None,
            items: vec![CountItem {
                item_id: Some("A-100".to_string()),
                item_name: Some("Widget".to_string()),
                quantity: 3,
                timestamp: None,
            }],
        };
        let inserted = record_counts(&db, &session).await.expect("insert should succeed");
        assert_eq!(inserted, 1);
        assert_eq!(db.opened.load(Ordering::SeqCst), 1);
        assert_eq!(db.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn count_session_deserializes_camel_case() {
        let session: CountSession = serde_json::from_str(
            r#"{
                "id": "abc",
                "locationId": "loc-7",
                "items": [
                    {"itemId": "A-100", "itemName": "Widget", "quantity": 2, "timestamp": "2024-03-01T12:00:00Z"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(session.location_id.as_deref(), Some("loc-7"));
        assert_eq!(session.items.len(), 1);
        assert_eq!(session.items[0].item_id.as_deref(), Some("A-100"));
        assert_eq!(session.items[0].quantity, 2);
    }
}
