use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{EventType, PoiChild, PoiRecord, Priority, RecurrencePattern};

fn validate_date_str(date: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ValidationError::new("date"))
}

fn validate_zipcode(zip: &str) -> Result<(), ValidationError> {
    if zip.len() == 7 && zip.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("zipcode"))
    }
}

// ============================================================================
// Event API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(custom = "validate_date_str")]
    pub date: String,

    pub time: Option<String>,
    pub family_member_id: String,
    pub event_type: EventType,

    #[serde(default)]
    pub is_all_day: bool,

    pub external_calendar_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(custom = "validate_date_str")]
    pub date: Option<String>,

    pub time: Option<String>,
    pub family_member_id: Option<String>,
    pub event_type: Option<EventType>,
    pub is_all_day: Option<bool>,
    pub external_calendar_id: Option<String>,
}

/// Drag-and-drop date reassignment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoveEventRequest {
    #[validate(custom = "validate_date_str")]
    pub date: String,
}

/// Bulk recurrence input. `start_date`/`end_date` bound every pattern except
/// `custom`, which emits exactly `explicit_dates`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub family_member_id: String,
    pub event_type: EventType,
    pub time: Option<String>,

    #[serde(default)]
    pub is_all_day: bool,

    pub pattern: RecurrencePattern,
    pub start_date: Option<String>,
    pub end_date: Option<String>,

    /// 0 = Sunday .. 6 = Saturday, for weekly/biweekly
    #[serde(default)]
    pub selected_weekdays: Vec<u8>,

    #[serde(default)]
    pub explicit_dates: Vec<String>,
}

/// Partial success is possible: failed adds are counted, never rolled back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEventResponse {
    pub created: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

// ============================================================================
// Todo API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub created_by: String,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

// ============================================================================
// Point Activity API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordCompletionRequest {
    pub child_id: String,

    #[validate(length(min = 1, max = 200))]
    pub task_name: String,

    #[validate(range(min = 0))]
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCompletionResponse {
    pub child: PoiChild,
    pub record: PoiRecord,
}

// ============================================================================
// Notification API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneResponse {
    pub deleted: usize,
}

// ============================================================================
// Google Calendar Sync API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Create,
    Update,
    Delete,
}

/// The slice of an event the remote calendar schema needs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSyncPayload {
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub time: Option<String>,
    pub event_type: EventType,
    #[serde(default)]
    pub is_all_day: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEventRequest {
    pub event: EventSyncPayload,
    pub action: SyncAction,
    pub external_event_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncEventResponse {
    pub success: bool,
    pub result: serde_json::Value,
}

// ============================================================================
// Settings API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub theme: crate::models::Theme,

    #[serde(default)]
    pub weather_enabled: bool,

    #[validate(custom = "validate_zipcode")]
    pub weather_zipcode: Option<String>,

    #[serde(default)]
    pub shift_commands: Vec<crate::models::ShiftCommand>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zipcode_must_be_seven_digits() {
        assert!(validate_zipcode("1234567").is_ok());
        assert!(validate_zipcode("123456").is_err());
        assert!(validate_zipcode("12345678").is_err());
        assert!(validate_zipcode("12a4567").is_err());
    }

    #[test]
    fn date_strings_must_parse() {
        assert!(validate_date_str("2024-06-03").is_ok());
        assert!(validate_date_str("2024-13-01").is_err());
        assert!(validate_date_str("june 3rd").is_err());
    }

    #[test]
    fn auth_url_serializes_camel_case() {
        let json = serde_json::to_string(&AuthUrlResponse {
            auth_url: "https://example.com".into(),
        })
        .unwrap();
        assert!(json.contains("authUrl"));
    }
}
