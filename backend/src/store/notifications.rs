use chrono::{Duration, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use shared::Notification;
use uuid::Uuid;

use super::{ChangeKind, Collection, Store, StoreResult};

/// Draft produced by the notification generator
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: String,
    pub title: String,
    pub message: String,
    pub target_id: String,
    pub target_type: String,
    pub created_by: String,
}

impl Store {
    pub async fn add_notification(&self, new: NewNotification) -> StoreResult<Notification> {
        use crate::schema::notifications::dsl::*;

        let mut conn = self.conn().await?;

        let row: Notification = diesel::insert_into(notifications)
            .values((
                id.eq(Uuid::new_v4()),
                kind.eq(&new.kind),
                title.eq(&new.title),
                message.eq(&new.message),
                target_id.eq(&new.target_id),
                target_type.eq(&new.target_type),
                created_by.eq(&new.created_by),
                is_read.eq(false),
            ))
            .get_result(&mut conn)
            .await?;

        self.publish(
            Collection::Notifications,
            ChangeKind::Added,
            row.id.to_string(),
        );
        Ok(row)
    }

    pub async fn get_notifications(&self) -> StoreResult<Vec<Notification>> {
        use crate::schema::notifications::dsl::*;

        let Some(mut conn) = self.read_conn().await? else {
            return Ok(Vec::new());
        };

        let items = notifications
            .order_by(created_at.desc())
            .load::<Notification>(&mut conn)
            .await?;

        Ok(items)
    }

    pub async fn mark_notification_read(&self, notification_id: Uuid) -> StoreResult<Notification> {
        use crate::schema::notifications::dsl::*;

        let mut conn = self.conn().await?;

        let row: Notification = diesel::update(notifications.filter(id.eq(notification_id)))
            .set(is_read.eq(true))
            .get_result(&mut conn)
            .await?;

        self.publish(
            Collection::Notifications,
            ChangeKind::Updated,
            row.id.to_string(),
        );
        Ok(row)
    }

    /// Explicit maintenance call; nothing schedules this automatically.
    pub async fn prune_notifications(&self, older_than_days: i64) -> StoreResult<usize> {
        use crate::schema::notifications::dsl::*;

        let mut conn = self.conn().await?;

        let cutoff = Utc::now() - Duration::days(older_than_days);
        let deleted = diesel::delete(notifications.filter(created_at.lt(cutoff)))
            .execute(&mut conn)
            .await?;

        Ok(deleted)
    }
}
