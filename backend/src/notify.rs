//! Notification generator: pure builders for the fixed title/message
//! templates, plus the fire-and-forget post-write hook.
//!
//! Notifications are best-effort. The hook spawns a detached task so a
//! failed notification write can never fail or delay the primary write.

use std::sync::Arc;

use shared::{Event, NotificationKind, PoiRecord, TargetType, TodoItem};

use crate::roster::Roster;
use crate::store::notifications::NewNotification;
use crate::store::Store;

pub fn event_added(roster: &Roster, event: &Event) -> NewNotification {
    let name = roster.display_name(&event.family_member_id);
    NewNotification {
        kind: NotificationKind::EventAdded.as_str().to_string(),
        title: "new event added".to_string(),
        message: format!("{} added a new event '{}'", name, event.title),
        target_id: event.id.to_string(),
        target_type: TargetType::Event.as_str().to_string(),
        created_by: name,
    }
}

pub fn event_updated(roster: &Roster, event: &Event) -> NewNotification {
    let name = roster.display_name(&event.family_member_id);
    NewNotification {
        kind: NotificationKind::EventUpdated.as_str().to_string(),
        title: "event updated".to_string(),
        message: format!("{} updated event '{}'", name, event.title),
        target_id: event.id.to_string(),
        target_type: TargetType::Event.as_str().to_string(),
        created_by: name,
    }
}

pub fn todo_added(roster: &Roster, todo: &TodoItem) -> NewNotification {
    let name = roster.display_name(&todo.created_by);
    NewNotification {
        kind: NotificationKind::TodoAdded.as_str().to_string(),
        title: "new todo added".to_string(),
        message: format!("{} added a new todo '{}'", name, todo.title),
        target_id: todo.id.to_string(),
        target_type: TargetType::Todo.as_str().to_string(),
        created_by: name,
    }
}

pub fn todo_updated(roster: &Roster, todo: &TodoItem) -> NewNotification {
    let name = roster.display_name(&todo.created_by);
    NewNotification {
        kind: NotificationKind::TodoUpdated.as_str().to_string(),
        title: "todo updated".to_string(),
        message: format!("{} updated todo '{}'", name, todo.title),
        target_id: todo.id.to_string(),
        target_type: TargetType::Todo.as_str().to_string(),
        created_by: name,
    }
}

pub fn poi_added(child_name: &str, record: &PoiRecord) -> NewNotification {
    NewNotification {
        kind: NotificationKind::PoiAdded.as_str().to_string(),
        title: "point task completed".to_string(),
        message: format!(
            "{} completed a point task (earned {} points)",
            child_name, record.points
        ),
        target_id: record.id.to_string(),
        target_type: TargetType::Poi.as_str().to_string(),
        created_by: child_name.to_string(),
    }
}

pub fn poi_updated(child_name: &str, record: &PoiRecord) -> NewNotification {
    NewNotification {
        kind: NotificationKind::PoiUpdated.as_str().to_string(),
        title: "point record updated".to_string(),
        message: format!("{}'s point record was updated", child_name),
        target_id: record.id.to_string(),
        target_type: TargetType::Poi.as_str().to_string(),
        created_by: child_name.to_string(),
    }
}

/// Fire-and-forget post-write hook. Failures are logged and swallowed.
pub fn publish(store: Arc<Store>, draft: NewNotification) {
    tokio::spawn(async move {
        if let Err(e) = store.add_notification(draft).await {
            tracing::warn!("best-effort notification write failed: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_event(member: &str) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "dentist".to_string(),
            description: None,
            date: "2024-06-03".to_string(),
            time: Some("14:00".to_string()),
            family_member_id: member.to_string(),
            event_type: "hospital".to_string(),
            is_all_day: false,
            external_calendar_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn event_added_uses_roster_name() {
        let roster = Roster::default();
        let draft = event_added(&roster, &sample_event("mom"));

        assert_eq!(draft.kind, "event_added");
        assert_eq!(draft.title, "new event added");
        assert_eq!(draft.message, "Mom added a new event 'dentist'");
        assert_eq!(draft.target_type, "event");
        assert_eq!(draft.created_by, "Mom");
    }

    #[test]
    fn unknown_actor_falls_back_to_raw_id() {
        let roster = Roster::default();
        let draft = event_updated(&roster, &sample_event("guest42"));

        assert_eq!(draft.message, "guest42 updated event 'dentist'");
        assert_eq!(draft.created_by, "guest42");
    }

    #[test]
    fn poi_added_reports_points() {
        let record = PoiRecord {
            id: Uuid::new_v4(),
            child_id: "alice".to_string(),
            task_name: "study".to_string(),
            points: 10,
            date: "2024-06-03".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let draft = poi_added("Alice", &record);

        assert_eq!(draft.kind, "poi_added");
        assert_eq!(draft.title, "point task completed");
        assert_eq!(
            draft.message,
            "Alice completed a point task (earned 10 points)"
        );
    }

    #[test]
    fn todo_templates_match() {
        let roster = Roster::default();
        let todo = TodoItem {
            id: Uuid::new_v4(),
            title: "buy milk".to_string(),
            description: None,
            completed: false,
            created_by: "dad".to_string(),
            priority: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let added = todo_added(&roster, &todo);
        assert_eq!(added.title, "new todo added");
        assert_eq!(added.message, "Dad added a new todo 'buy milk'");

        let updated = todo_updated(&roster, &todo);
        assert_eq!(updated.title, "todo updated");
        assert_eq!(updated.message, "Dad updated todo 'buy milk'");
    }
}
