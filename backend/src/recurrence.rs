//! Recurrence expander: turns a bulk-entry request into the concrete set of
//! event payloads to persist, one per matching calendar date.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use thiserror::Error;

use shared::api::BulkEventRequest;
use shared::RecurrencePattern;

use crate::store::events::NewEvent;

const DATE_FMT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecurrenceError {
    #[error("start date must be on or before end date")]
    StartAfterEnd,

    #[error("start and end dates are required for this pattern")]
    MissingRange,

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Expand a request into insert payloads. Only `date` varies between them.
pub fn expand(req: &BulkEventRequest) -> Result<Vec<NewEvent>, RecurrenceError> {
    let dates = generate_dates(req)?;

    Ok(dates
        .into_iter()
        .map(|d| NewEvent {
            title: req.title.clone(),
            description: req.description.clone(),
            date: d,
            time: req.time.clone(),
            family_member_id: req.family_member_id.clone(),
            event_type: req.event_type.as_str().to_string(),
            is_all_day: req.is_all_day,
            external_calendar_id: None,
        })
        .collect())
}

/// The matching dates for a request, as `YYYY-MM-DD` strings in order.
pub fn generate_dates(req: &BulkEventRequest) -> Result<Vec<String>, RecurrenceError> {
    // Custom ignores the range entirely: exactly the explicit list, deduped.
    if req.pattern == RecurrencePattern::Custom {
        let mut out: Vec<String> = Vec::new();
        for raw in &req.explicit_dates {
            parse_date(raw)?;
            if !out.iter().any(|d| d == raw) {
                out.push(raw.clone());
            }
        }
        return Ok(out);
    }

    let start = parse_date(req.start_date.as_deref().ok_or(RecurrenceError::MissingRange)?)?;
    let end = parse_date(req.end_date.as_deref().ok_or(RecurrenceError::MissingRange)?)?;
    if start > end {
        return Err(RecurrenceError::StartAfterEnd);
    }

    let dates = match req.pattern {
        RecurrencePattern::Daily => every_day(start, end),
        RecurrencePattern::Weekdays => every_day(start, end)
            .into_iter()
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .collect(),
        RecurrencePattern::Weekly => step_weeks(start, end, &req.selected_weekdays, 1),
        RecurrencePattern::Biweekly => step_weeks(start, end, &req.selected_weekdays, 2),
        RecurrencePattern::Monthly => same_day_each_month(start, end),
        RecurrencePattern::Custom => unreachable!("handled above"),
    };

    Ok(dates
        .into_iter()
        .map(|d| d.format(DATE_FMT).to_string())
        .collect())
}

fn parse_date(raw: &str) -> Result<NaiveDate, RecurrenceError> {
    NaiveDate::parse_from_str(raw, DATE_FMT)
        .map_err(|_| RecurrenceError::InvalidDate(raw.to_string()))
}

fn every_day(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Walk Sunday-based weeks with a cursor advancing `weeks_per_step` weeks at
/// a time from `start`. Only weeks the cursor lands in are visited, and a
/// selected weekday earlier than `start` within the first week is skipped —
/// observable behavior preserved from the original bulk-entry tool.
fn step_weeks(
    start: NaiveDate,
    end: NaiveDate,
    selected_weekdays: &[u8],
    weeks_per_step: i64,
) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut cursor = start;

    while cursor <= end {
        let week_start = cursor - Duration::days(cursor.weekday().num_days_from_sunday() as i64);
        for &wd in selected_weekdays {
            if wd > 6 {
                continue;
            }
            let candidate = week_start + Duration::days(wd as i64);
            if candidate >= start && candidate <= end {
                out.push(candidate);
            }
        }
        cursor += Duration::days(7 * weeks_per_step);
    }

    out.sort();
    out.dedup();
    out
}

/// Months lacking the start's day-of-month are skipped, not clamped.
fn same_day_each_month(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let day = start.day();
    let mut out = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());

    while (year, month) <= (end.year(), end.month()) {
        if let Some(candidate) = NaiveDate::from_ymd_opt(year, month, day) {
            if candidate >= start && candidate <= end {
                out.push(candidate);
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::EventType;

    fn request(pattern: RecurrencePattern, start: &str, end: &str) -> BulkEventRequest {
        BulkEventRequest {
            title: "swim class".to_string(),
            description: None,
            family_member_id: "alice".to_string(),
            event_type: EventType::Other,
            time: None,
            is_all_day: true,
            pattern,
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            selected_weekdays: Vec::new(),
            explicit_dates: Vec::new(),
        }
    }

    #[test]
    fn daily_covers_every_date_in_range_inclusive() {
        let req = request(RecurrencePattern::Daily, "2024-06-28", "2024-07-02");
        let dates = generate_dates(&req).unwrap();
        assert_eq!(
            dates,
            vec![
                "2024-06-28",
                "2024-06-29",
                "2024-06-30",
                "2024-07-01",
                "2024-07-02"
            ]
        );
    }

    #[test]
    fn start_after_end_is_rejected() {
        let req = request(RecurrencePattern::Daily, "2024-06-10", "2024-06-09");
        assert_eq!(generate_dates(&req), Err(RecurrenceError::StartAfterEnd));
    }

    #[test]
    fn weekdays_skips_weekends() {
        let req = request(RecurrencePattern::Weekdays, "2024-06-01", "2024-06-30");
        let dates = generate_dates(&req).unwrap();

        assert!(!dates.is_empty());
        for d in &dates {
            let parsed = NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap();
            assert!(!matches!(parsed.weekday(), Weekday::Sat | Weekday::Sun));
        }
        // 2024-06-01 is a Saturday; the first generated date is Monday the 3rd.
        assert_eq!(dates.first().unwrap(), "2024-06-03");
    }

    #[test]
    fn weekly_monday_wednesday_worked_example() {
        let mut req = request(RecurrencePattern::Weekly, "2024-06-03", "2024-06-30");
        req.selected_weekdays = vec![1, 3];

        let dates = generate_dates(&req).unwrap();
        assert_eq!(
            dates,
            vec![
                "2024-06-03",
                "2024-06-05",
                "2024-06-10",
                "2024-06-12",
                "2024-06-17",
                "2024-06-19",
                "2024-06-24",
                "2024-06-26"
            ]
        );
    }

    #[test]
    fn weekly_skips_selected_day_earlier_in_first_week() {
        // Start is Monday 2024-06-03; Sunday (0) of that week is 06-02 and
        // falls before the start, so the first emitted Sunday is 06-09.
        let mut req = request(RecurrencePattern::Weekly, "2024-06-03", "2024-06-30");
        req.selected_weekdays = vec![0];

        let dates = generate_dates(&req).unwrap();
        assert_eq!(
            dates,
            vec!["2024-06-09", "2024-06-16", "2024-06-23", "2024-06-30"]
        );
    }

    #[test]
    fn biweekly_visits_alternate_weeks() {
        let mut req = request(RecurrencePattern::Biweekly, "2024-06-03", "2024-06-30");
        req.selected_weekdays = vec![1];

        let dates = generate_dates(&req).unwrap();
        assert_eq!(dates, vec!["2024-06-03", "2024-06-17"]);
    }

    #[test]
    fn monthly_keeps_day_of_month_and_skips_short_months() {
        let req = request(RecurrencePattern::Monthly, "2024-01-31", "2024-06-30");
        let dates = generate_dates(&req).unwrap();
        // February (29 days), April and June (30 days) have no 31st.
        assert_eq!(dates, vec!["2024-01-31", "2024-03-31", "2024-05-31"]);
    }

    #[test]
    fn monthly_day_31_generates_nothing_in_thirty_day_months() {
        let req = request(RecurrencePattern::Monthly, "2024-03-31", "2024-04-30");
        let dates = generate_dates(&req).unwrap();
        assert_eq!(dates, vec!["2024-03-31"]);
    }

    #[test]
    fn custom_emits_explicit_dates_deduplicated_ignoring_range() {
        let mut req = request(RecurrencePattern::Custom, "2024-06-10", "2024-06-09");
        req.explicit_dates = vec![
            "2024-12-24".to_string(),
            "2024-01-01".to_string(),
            "2024-12-24".to_string(),
        ];

        // The inverted range is irrelevant for custom.
        let dates = generate_dates(&req).unwrap();
        assert_eq!(dates, vec!["2024-12-24", "2024-01-01"]);
    }

    #[test]
    fn custom_rejects_malformed_dates() {
        let mut req = request(RecurrencePattern::Custom, "2024-06-01", "2024-06-30");
        req.explicit_dates = vec!["christmas".to_string()];
        assert!(matches!(
            generate_dates(&req),
            Err(RecurrenceError::InvalidDate(_))
        ));
    }

    #[test]
    fn all_range_patterns_stay_inside_the_range() {
        for pattern in [
            RecurrencePattern::Daily,
            RecurrencePattern::Weekdays,
            RecurrencePattern::Weekly,
            RecurrencePattern::Biweekly,
            RecurrencePattern::Monthly,
        ] {
            let mut req = request(pattern, "2024-06-05", "2024-07-14");
            req.selected_weekdays = vec![0, 2, 5];

            for d in generate_dates(&req).unwrap() {
                assert!(d.as_str() >= "2024-06-05" && d.as_str() <= "2024-07-14", "{:?} produced {}", pattern, d);
            }
        }
    }

    #[test]
    fn expand_varies_only_the_date() {
        let req = request(RecurrencePattern::Daily, "2024-06-01", "2024-06-03");
        let payloads = expand(&req).unwrap();

        assert_eq!(payloads.len(), 3);
        for p in &payloads {
            assert_eq!(p.title, "swim class");
            assert_eq!(p.family_member_id, "alice");
            assert_eq!(p.event_type, "other");
            assert!(p.is_all_day);
        }
        assert_eq!(payloads[0].date, "2024-06-01");
        assert_eq!(payloads[2].date, "2024-06-03");
    }
}
