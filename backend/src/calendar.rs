//! Calendar aggregation: per-day and per-member bucketing for grid and list
//! rendering, plus the drag-reassignment planner.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use shared::Event;
use uuid::Uuid;

/// Events shown on `day` (exact string match); the "day off" shift marker is
/// suppressed even though it remains in the store.
pub fn events_for_day<'a>(day: &str, events: &'a [Event]) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|e| e.date == day && !e.is_day_off_marker())
        .collect()
}

pub fn events_for_day_and_member<'a>(
    day: &str,
    member_id: &str,
    events: &'a [Event],
) -> Vec<&'a Event> {
    events_for_day(day, events)
        .into_iter()
        .filter(|e| e.family_member_id == member_id)
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: String,
    pub events: Vec<Event>,
}

/// One bucket per day of the month, in calendar order. An invalid
/// year/month yields an empty grid.
pub fn month_grid(year: i32, month: u32, events: &[Event]) -> Vec<DayBucket> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut day = first;
    while day.month() == month && day.year() == year {
        let date = day.format("%Y-%m-%d").to_string();
        let bucket = DayBucket {
            events: events_for_day(&date, events)
                .into_iter()
                .cloned()
                .collect(),
            date,
        };
        out.push(bucket);
        day += Duration::days(1);
    }

    out
}

/// The single store write a drag reassignment requires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOp {
    pub id: Uuid,
    pub date: String,
}

/// Plan a drag-and-drop date reassignment. `None` means no-op: either the
/// event is unknown or it was dropped on its current date — zero store
/// calls in both cases.
pub fn plan_move(events: &[Event], id: Uuid, target_date: &str) -> Option<MoveOp> {
    let event = events.iter().find(|e| e.id == id)?;
    if event.date == target_date {
        return None;
    }

    Some(MoveOp {
        id,
        date: target_date.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(title: &str, date: &str, member: &str, event_type: &str) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            date: date.to_string(),
            time: None,
            family_member_id: member.to_string(),
            event_type: event_type.to_string(),
            is_all_day: true,
            external_calendar_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn events_for_day_matches_exact_date() {
        let events = vec![
            event("a", "2024-06-03", "mom", "work"),
            event("b", "2024-06-04", "mom", "work"),
        ];

        let day = events_for_day("2024-06-03", &events);
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].title, "a");
    }

    #[test]
    fn day_off_marker_is_suppressed_but_other_shifts_show() {
        let events = vec![
            event("day off", "2024-06-03", "dad", "shift"),
            event("early shift", "2024-06-03", "dad", "shift"),
            event("day off", "2024-06-03", "dad", "work"), // not a shift: shown
        ];

        let day = events_for_day("2024-06-03", &events);
        let titles: Vec<_> = day.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["early shift", "day off"]);
    }

    #[test]
    fn member_filter_applies_after_suppression() {
        let events = vec![
            event("day off", "2024-06-03", "dad", "shift"),
            event("meeting", "2024-06-03", "dad", "work"),
            event("school trip", "2024-06-03", "alice", "school"),
        ];

        let dad = events_for_day_and_member("2024-06-03", "dad", &events);
        assert_eq!(dad.len(), 1);
        assert_eq!(dad[0].title, "meeting");
    }

    #[test]
    fn month_grid_has_one_bucket_per_day() {
        let events = vec![event("a", "2024-02-29", "mom", "work")];
        let grid = month_grid(2024, 2, &events);

        assert_eq!(grid.len(), 29);
        assert_eq!(grid[0].date, "2024-02-01");
        assert_eq!(grid[28].date, "2024-02-29");
        assert_eq!(grid[28].events.len(), 1);
    }

    #[test]
    fn plan_move_to_same_date_is_a_noop() {
        let events = vec![event("a", "2024-06-03", "mom", "work")];
        assert_eq!(plan_move(&events, events[0].id, "2024-06-03"), None);
    }

    #[test]
    fn plan_move_to_new_date_issues_one_update() {
        let events = vec![event("a", "2024-06-03", "mom", "work")];
        let op = plan_move(&events, events[0].id, "2024-06-10").unwrap();
        assert_eq!(op.id, events[0].id);
        assert_eq!(op.date, "2024-06-10");
    }

    #[test]
    fn plan_move_of_unknown_event_is_a_noop() {
        let events = vec![event("a", "2024-06-03", "mom", "work")];
        assert_eq!(plan_move(&events, Uuid::new_v4(), "2024-06-10"), None);
    }
}
