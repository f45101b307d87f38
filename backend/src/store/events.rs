use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use shared::Event;
use uuid::Uuid;

use super::{month_bounds, ChangeKind, Collection, Store, StoreResult};

/// Insert payload, produced by the event form or the recurrence expander
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: Option<String>,
    pub family_member_id: String,
    pub event_type: String,
    pub is_all_day: bool,
    pub external_calendar_id: Option<String>,
}

/// Partial update; `None` fields are never written
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub family_member_id: Option<String>,
    pub event_type: Option<String>,
    pub is_all_day: Option<bool>,
    pub external_calendar_id: Option<String>,
}

impl Store {
    pub async fn add_event(&self, new: NewEvent) -> StoreResult<Event> {
        use crate::schema::events::dsl::*;

        let mut conn = self.conn().await?;

        let row: Event = diesel::insert_into(events)
            .values((
                id.eq(Uuid::new_v4()),
                title.eq(&new.title),
                description.eq(new.description.as_deref()),
                date.eq(&new.date),
                time.eq(new.time.as_deref()),
                family_member_id.eq(&new.family_member_id),
                event_type.eq(&new.event_type),
                is_all_day.eq(new.is_all_day),
                external_calendar_id.eq(new.external_calendar_id.as_deref()),
            ))
            .get_result(&mut conn)
            .await?;

        self.publish(Collection::Events, ChangeKind::Added, row.id.to_string());
        Ok(row)
    }

    pub async fn get_all_events(&self) -> StoreResult<Vec<Event>> {
        use crate::schema::events::dsl::*;

        let Some(mut conn) = self.read_conn().await? else {
            return Ok(Vec::new());
        };

        let items = events.order_by(date.asc()).load::<Event>(&mut conn).await?;
        Ok(items)
    }

    pub async fn get_events_by_month(&self, year: i32, month: u32) -> StoreResult<Vec<Event>> {
        use crate::schema::events::dsl::*;

        let Some(mut conn) = self.read_conn().await? else {
            return Ok(Vec::new());
        };

        let (lo, hi) = month_bounds(year, month);
        let items = events
            .filter(date.ge(lo))
            .filter(date.le(hi))
            .order_by(date.asc())
            .load::<Event>(&mut conn)
            .await?;

        Ok(items)
    }

    pub async fn get_event(&self, event_id: Uuid) -> StoreResult<Option<Event>> {
        use crate::schema::events::dsl::*;

        let Some(mut conn) = self.read_conn().await? else {
            return Ok(None);
        };

        let row = events
            .filter(id.eq(event_id))
            .first::<Event>(&mut conn)
            .await
            .optional()?;

        Ok(row)
    }

    pub async fn update_event(&self, event_id: Uuid, patch: EventPatch) -> StoreResult<Event> {
        use crate::schema::events::dsl::*;

        let mut conn = self.conn().await?;

        // Write each supplied field; absent fields stay untouched.
        if let Some(t) = patch.title {
            diesel::update(events.filter(id.eq(event_id)))
                .set(title.eq(t))
                .execute(&mut conn)
                .await?;
        }
        if let Some(d) = patch.description {
            diesel::update(events.filter(id.eq(event_id)))
                .set(description.eq(Some(d)))
                .execute(&mut conn)
                .await?;
        }
        if let Some(d) = patch.date {
            diesel::update(events.filter(id.eq(event_id)))
                .set(date.eq(d))
                .execute(&mut conn)
                .await?;
        }
        if let Some(t) = patch.time {
            diesel::update(events.filter(id.eq(event_id)))
                .set(time.eq(Some(t)))
                .execute(&mut conn)
                .await?;
        }
        if let Some(m) = patch.family_member_id {
            diesel::update(events.filter(id.eq(event_id)))
                .set(family_member_id.eq(m))
                .execute(&mut conn)
                .await?;
        }
        if let Some(t) = patch.event_type {
            diesel::update(events.filter(id.eq(event_id)))
                .set(event_type.eq(t))
                .execute(&mut conn)
                .await?;
        }
        if let Some(a) = patch.is_all_day {
            diesel::update(events.filter(id.eq(event_id)))
                .set(is_all_day.eq(a))
                .execute(&mut conn)
                .await?;
        }
        if let Some(x) = patch.external_calendar_id {
            diesel::update(events.filter(id.eq(event_id)))
                .set(external_calendar_id.eq(Some(x)))
                .execute(&mut conn)
                .await?;
        }

        // Always bump updated_at and return the result
        let updated: Event = diesel::update(events.filter(id.eq(event_id)))
            .set(updated_at.eq(Utc::now()))
            .get_result(&mut conn)
            .await?;

        self.publish(Collection::Events, ChangeKind::Updated, updated.id.to_string());
        Ok(updated)
    }

    pub async fn delete_event(&self, event_id: Uuid) -> StoreResult<()> {
        use crate::schema::events::dsl::*;

        let mut conn = self.conn().await?;

        diesel::delete(events.filter(id.eq(event_id)))
            .execute(&mut conn)
            .await?;

        self.publish(Collection::Events, ChangeKind::Deleted, event_id.to_string());
        Ok(())
    }
}
