use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use shared::{PoiChild, PoiRecord};
use uuid::Uuid;

use super::{month_bounds, ChangeKind, Collection, Store, StoreResult};

/// Audit-trail insert; records are append-only and never mutated or deleted
/// by the application.
#[derive(Debug, Clone)]
pub struct NewPoiRecord {
    pub child_id: String,
    pub task_name: String,
    pub points: i32,
    pub date: String,
}

impl Store {
    pub async fn get_poi_children(&self) -> StoreResult<Vec<PoiChild>> {
        use crate::schema::poi_children::dsl::*;

        let Some(mut conn) = self.read_conn().await? else {
            return Ok(Vec::new());
        };

        let items = poi_children
            .order_by(name.asc())
            .load::<PoiChild>(&mut conn)
            .await?;

        Ok(items)
    }

    pub async fn get_poi_child(&self, child: &str) -> StoreResult<Option<PoiChild>> {
        use crate::schema::poi_children::dsl::*;

        let Some(mut conn) = self.read_conn().await? else {
            return Ok(None);
        };

        let row = poi_children
            .filter(id.eq(child))
            .first::<PoiChild>(&mut conn)
            .await
            .optional()?;

        Ok(row)
    }

    /// Zero-balance record for a child seen for the first time
    pub async fn create_poi_child(&self, child: &str, child_name: &str) -> StoreResult<PoiChild> {
        use crate::schema::poi_children::dsl::*;

        let mut conn = self.conn().await?;

        let row: PoiChild = diesel::insert_into(poi_children)
            .values((id.eq(child), name.eq(child_name), total_points.eq(0)))
            .get_result(&mut conn)
            .await?;

        self.publish(Collection::PoiChildren, ChangeKind::Added, row.id.clone());
        Ok(row)
    }

    pub async fn set_poi_child_points(&self, child: &str, total: i32) -> StoreResult<PoiChild> {
        use crate::schema::poi_children::dsl::*;

        let mut conn = self.conn().await?;

        let row: PoiChild = diesel::update(poi_children.filter(id.eq(child)))
            .set(total_points.eq(total))
            .get_result(&mut conn)
            .await?;

        self.publish(Collection::PoiChildren, ChangeKind::Updated, row.id.clone());
        Ok(row)
    }

    pub async fn add_poi_record(&self, new: NewPoiRecord) -> StoreResult<PoiRecord> {
        use crate::schema::poi_records::dsl::*;

        let mut conn = self.conn().await?;

        let row: PoiRecord = diesel::insert_into(poi_records)
            .values((
                id.eq(Uuid::new_v4()),
                child_id.eq(&new.child_id),
                task_name.eq(&new.task_name),
                points.eq(new.points),
                date.eq(&new.date),
            ))
            .get_result(&mut conn)
            .await?;

        self.publish(Collection::PoiRecords, ChangeKind::Added, row.id.to_string());
        Ok(row)
    }

    pub async fn get_poi_records_by_month(
        &self,
        year: i32,
        month: u32,
    ) -> StoreResult<Vec<PoiRecord>> {
        use crate::schema::poi_records::dsl::*;

        let Some(mut conn) = self.read_conn().await? else {
            return Ok(Vec::new());
        };

        let (lo, hi) = month_bounds(year, month);
        let items = poi_records
            .filter(date.ge(lo))
            .filter(date.le(hi))
            .order_by(date.asc())
            .load::<PoiRecord>(&mut conn)
            .await?;

        Ok(items)
    }
}
