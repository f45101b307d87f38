//! Point-activity ledger: balance increment plus an independent audit
//! record per completed task.

use async_trait::async_trait;
use chrono::Utc;
use shared::{PoiChild, PoiRecord};

use crate::roster::Roster;
use crate::store::poi::NewPoiRecord;
use crate::store::{Store, StoreResult};

/// The store operations the ledger needs; a seam so the write sequence is
/// testable without a database.
#[async_trait]
pub trait LedgerStore {
    async fn child(&self, child_id: &str) -> StoreResult<Option<PoiChild>>;
    async fn create_child(&self, child_id: &str, name: &str) -> StoreResult<PoiChild>;
    async fn set_points(&self, child_id: &str, total: i32) -> StoreResult<PoiChild>;
    async fn append_record(&self, record: NewPoiRecord) -> StoreResult<PoiRecord>;
}

#[async_trait]
impl LedgerStore for Store {
    async fn child(&self, child_id: &str) -> StoreResult<Option<PoiChild>> {
        self.get_poi_child(child_id).await
    }

    async fn create_child(&self, child_id: &str, name: &str) -> StoreResult<PoiChild> {
        self.create_poi_child(child_id, name).await
    }

    async fn set_points(&self, child_id: &str, total: i32) -> StoreResult<PoiChild> {
        self.set_poi_child_points(child_id, total).await
    }

    async fn append_record(&self, record: NewPoiRecord) -> StoreResult<PoiRecord> {
        self.add_poi_record(record).await
    }
}

/// Record a completed task: read the balance (initializing a zero-balance
/// child if none exists), write `current + points`, then append the audit
/// record. The two writes are sequential, not atomic — a failed append
/// leaves the new balance in place.
pub async fn record_completion<S: LedgerStore + ?Sized>(
    store: &S,
    roster: &Roster,
    child_id: &str,
    task_name: &str,
    points: i32,
) -> StoreResult<(PoiChild, PoiRecord)> {
    let child = match store.child(child_id).await? {
        Some(child) => child,
        None => {
            store
                .create_child(child_id, &roster.display_name(child_id))
                .await?
        }
    };

    let updated = store
        .set_points(child_id, child.total_points + points)
        .await?;

    let record = store
        .append_record(NewPoiRecord {
            child_id: child_id.to_string(),
            task_name: task_name.to_string(),
            points,
            date: Utc::now().format("%Y-%m-%d").to_string(),
        })
        .await?;

    Ok((updated, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct MemoryLedger {
        children: Mutex<HashMap<String, PoiChild>>,
        records: Mutex<Vec<PoiRecord>>,
    }

    #[async_trait]
    impl LedgerStore for MemoryLedger {
        async fn child(&self, child_id: &str) -> StoreResult<Option<PoiChild>> {
            Ok(self.children.lock().unwrap().get(child_id).cloned())
        }

        async fn create_child(&self, child_id: &str, name: &str) -> StoreResult<PoiChild> {
            let child = PoiChild {
                id: child_id.to_string(),
                name: name.to_string(),
                total_points: 0,
            };
            self.children
                .lock()
                .unwrap()
                .insert(child_id.to_string(), child.clone());
            Ok(child)
        }

        async fn set_points(&self, child_id: &str, total: i32) -> StoreResult<PoiChild> {
            let mut children = self.children.lock().unwrap();
            let child = children.get_mut(child_id).expect("child exists");
            child.total_points = total;
            Ok(child.clone())
        }

        async fn append_record(&self, record: NewPoiRecord) -> StoreResult<PoiRecord> {
            let now = Utc::now();
            let row = PoiRecord {
                id: Uuid::new_v4(),
                child_id: record.child_id,
                task_name: record.task_name,
                points: record.points,
                date: record.date,
                created_at: now,
                updated_at: now,
            };
            self.records.lock().unwrap().push(row.clone());
            Ok(row)
        }
    }

    #[tokio::test]
    async fn fresh_child_gets_balance_and_one_audit_record() {
        let store = MemoryLedger::default();
        let roster = Roster::default();

        let (child, record) = record_completion(&store, &roster, "alice", "study", 10)
            .await
            .unwrap();

        assert_eq!(child.total_points, 10);
        assert_eq!(child.name, "Alice");
        assert_eq!(record.points, 10);
        assert_eq!(record.task_name, "study");

        let records = store.records.lock().unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn balance_accumulates_across_completions() {
        let store = MemoryLedger::default();
        let roster = Roster::default();

        record_completion(&store, &roster, "ken", "dishes", 5)
            .await
            .unwrap();
        let (child, _) = record_completion(&store, &roster, "ken", "laundry", 7)
            .await
            .unwrap();

        assert_eq!(child.total_points, 12);
        assert_eq!(store.records.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_child_id_becomes_its_own_name() {
        let store = MemoryLedger::default();
        let roster = Roster::default();

        let (child, _) = record_completion(&store, &roster, "cousin9", "chores", 3)
            .await
            .unwrap();

        assert_eq!(child.name, "cousin9");
        assert_eq!(child.total_points, 3);
    }
}
