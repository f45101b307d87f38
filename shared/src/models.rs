use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category of a calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Work,
    School,
    Hospital,
    Travel,
    Other,
    Shift,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Work => "work",
            EventType::School => "school",
            EventType::Hospital => "hospital",
            EventType::Travel => "travel",
            EventType::Other => "other",
            EventType::Shift => "shift",
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(EventType::Work),
            "school" => Ok(EventType::School),
            "hospital" => Ok(EventType::Hospital),
            "travel" => Ok(EventType::Travel),
            "other" => Ok(EventType::Other),
            "shift" => Ok(EventType::Shift),
            other => Err(format!("unknown event type: {}", other)),
        }
    }
}

/// Shift events with this title are stored but suppressed from every
/// calendar and list view.
pub const DAY_OFF_TITLE: &str = "day off";

/// Calendar event matching database column order exactly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, diesel::Queryable)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`; the sole ordering/grouping key for calendar placement
    pub date: String,
    /// `HH:MM`, absent for all-day events
    pub time: Option<String>,
    pub family_member_id: String,
    pub event_type: String, // stored as TEXT: work|school|hospital|travel|other|shift
    pub is_all_day: bool,
    pub external_calendar_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// The "day off" shift marker is stored and editable but never shown.
    pub fn is_day_off_marker(&self) -> bool {
        self.event_type == EventType::Shift.as_str() && self.title == DAY_OFF_TITLE
    }
}

/// Priority level for a todo item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Todo item matching database column order exactly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, diesel::Queryable)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_by: String,
    pub priority: Option<String>, // stored as TEXT: low|medium|high
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tracked child in the point-activity module. `total_points` is the
/// balance of record, not derived from summing audit records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, diesel::Queryable)]
#[serde(rename_all = "camelCase")]
pub struct PoiChild {
    pub id: String,
    pub name: String,
    pub total_points: i32,
}

/// Append-only audit entry for a completed point task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, diesel::Queryable)]
#[serde(rename_all = "camelCase")]
pub struct PoiRecord {
    pub id: Uuid,
    pub child_id: String,
    pub task_name: String,
    pub points: i32,
    pub date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a notification points back at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Event,
    Todo,
    Poi,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Event => "event",
            TargetType::Todo => "todo",
            TargetType::Poi => "poi",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    EventAdded,
    EventUpdated,
    TodoAdded,
    TodoUpdated,
    PoiAdded,
    PoiUpdated,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::EventAdded => "event_added",
            NotificationKind::EventUpdated => "event_updated",
            NotificationKind::TodoAdded => "todo_added",
            NotificationKind::TodoUpdated => "todo_updated",
            NotificationKind::PoiAdded => "poi_added",
            NotificationKind::PoiUpdated => "poi_updated",
        }
    }
}

/// Notification matching database column order exactly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, diesel::Queryable)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub kind: String, // stored as TEXT, one of NotificationKind
    pub title: String,
    pub message: String,
    pub target_id: String,
    pub target_type: String, // stored as TEXT: event|todo|poi
    pub created_by: String,  // display name, not a member id
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Repetition rule for bulk event generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    /// Monday through Friday only
    Weekdays,
    Weekly,
    Biweekly,
    Monthly,
    /// Explicit date list; ignores the start/end range
    Custom,
}

/// Roster entry. The roster is configuration, not a stored entity; a
/// dangling member id degrades display but is never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// UI theme, one of a fixed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Forest,
    Sakura,
    Ocean,
}

/// A user-defined shorthand for the shift-entry tool: typing `command`
/// creates a shift event titled `name` at the optional `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftCommand {
    pub command: String,
    pub name: String,
    pub time: Option<String>,
}

/// Small scalar user preferences, persisted outside the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    pub weather_enabled: bool,
    /// 7-digit postal code for the weather display
    pub weather_zipcode: Option<String>,
    pub shift_commands: Vec<ShiftCommand>,
}
