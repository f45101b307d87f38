//! Document-store adapter for the five record collections.
//!
//! `Store` wraps an optional connection pool: when configuration is missing
//! the store is "uninitialized" — every write fails fast, every read returns
//! an empty result, and the presentation layer degrades to an empty calendar
//! instead of crashing. Successful writes publish a `StoreChange` on the
//! changefeed, which is the subscription surface for live views.

pub mod events;
pub mod notifications;
pub mod poi;
pub mod todos;

use diesel_async::pooled_connection::deadpool::{Object, Pool};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

pub type DbPool = Pool<AsyncPgConnection>;
type DbConn = Object<AsyncPgConnection>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store is not initialized")]
    NotInitialized,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => StoreError::NotFound("record"),
            other => StoreError::Backend(other.into()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Events,
    Todos,
    PoiChildren,
    PoiRecords,
    Notifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Updated,
    Deleted,
}

/// One record-level change, pushed to subscribers after the write commits
#[derive(Debug, Clone, Serialize)]
pub struct StoreChange {
    pub collection: Collection,
    pub kind: ChangeKind,
    pub id: String,
}

pub struct Store {
    pool: Option<DbPool>,
    feed: broadcast::Sender<StoreChange>,
}

impl Store {
    pub fn connect(database_url: &str) -> anyhow::Result<Self> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(manager).build()?;
        let (feed, _) = broadcast::channel(256);

        Ok(Self {
            pool: Some(pool),
            feed,
        })
    }

    /// A store with no backing connection (missing configuration).
    pub fn unconfigured() -> Self {
        let (feed, _) = broadcast::channel(16);
        Self { pool: None, feed }
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.is_some()
    }

    /// Live change stream. Dropping the receiver unsubscribes; on an
    /// unconfigured store the receiver simply never yields.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.feed.subscribe()
    }

    /// Connection for a write path; fails fast when unconfigured.
    pub(crate) async fn conn(&self) -> StoreResult<DbConn> {
        let pool = self.pool.as_ref().ok_or(StoreError::NotInitialized)?;
        let conn = pool
            .get()
            .await
            .map_err(|e| StoreError::Backend(anyhow::Error::new(e)))?;
        Ok(conn)
    }

    /// Connection for a read path; `None` means "unconfigured, read as empty".
    pub(crate) async fn read_conn(&self) -> StoreResult<Option<DbConn>> {
        match &self.pool {
            None => Ok(None),
            Some(pool) => {
                let conn = pool
                    .get()
                    .await
                    .map_err(|e| StoreError::Backend(anyhow::Error::new(e)))?;
                Ok(Some(conn))
            }
        }
    }

    pub(crate) fn publish(&self, collection: Collection, kind: ChangeKind, id: impl Into<String>) {
        // No subscribers is fine; the feed is best-effort.
        let _ = self.feed.send(StoreChange {
            collection,
            kind,
            id: id.into(),
        });
    }
}

/// Lexicographic month bounds over `YYYY-MM-DD` date strings. The upper
/// bound always ends in `-31`: no stored date exceeds its own month, so the
/// range filters correctly even for short months.
pub fn month_bounds(year: i32, month: u32) -> (String, String) {
    (
        format!("{:04}-{:02}-01", year, month),
        format!("{:04}-{:02}-31", year, month),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bounds_are_zero_padded() {
        let (lo, hi) = month_bounds(2024, 6);
        assert_eq!(lo, "2024-06-01");
        assert_eq!(hi, "2024-06-31");
    }

    #[test]
    fn february_upper_bound_stays_below_march() {
        // The "-31" bound is not a real date, but as a string it still sorts
        // before the first day of the next month.
        let (lo, hi) = month_bounds(2023, 2);
        assert_eq!(lo, "2023-02-01");
        assert_eq!(hi, "2023-02-31");
        assert!(hi.as_str() < "2023-03-01");
        assert!("2023-02-28" <= hi.as_str());
    }

    #[tokio::test]
    async fn unconfigured_store_fails_writes_and_reads_empty() {
        let store = Store::unconfigured();
        assert!(!store.is_initialized());
        assert!(matches!(
            store.conn().await,
            Err(StoreError::NotInitialized)
        ));
        assert!(store.read_conn().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn changefeed_delivers_published_changes() {
        let store = Store::unconfigured();
        let mut rx = store.subscribe();
        store.publish(Collection::Events, ChangeKind::Added, "abc");

        let change = rx.recv().await.unwrap();
        assert_eq!(change.collection, Collection::Events);
        assert_eq!(change.kind, ChangeKind::Added);
        assert_eq!(change.id, "abc");
    }
}
