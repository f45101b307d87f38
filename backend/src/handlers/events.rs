//! Event endpoints: CRUD, month queries, the calendar grid, bulk recurrence
//! entry, and drag-and-drop date moves.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use shared::api::{
    BulkEventRequest, BulkEventResponse, CreateEventRequest, MonthQuery, MoveEventRequest,
    UpdateEventRequest,
};
use shared::Event;

use crate::calendar::{self, DayBucket};
use crate::error::{ApiError, ApiResult};
use crate::notify;
use crate::recurrence;
use crate::store::events::{EventPatch, NewEvent};
use crate::AppState;

pub async fn list_events(State(state): State<AppState>) -> ApiResult<Json<Vec<Event>>> {
    let events = state.store.get_all_events().await?;
    Ok(Json(events))
}

pub async fn list_events_by_month(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = state
        .store
        .get_events_by_month(query.year, query.month)
        .await?;
    Ok(Json(events))
}

/// One bucket per day of the month, with the "day off" marker suppressed.
pub async fn month_view(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Json<Vec<DayBucket>>> {
    let events = state.store.get_events_by_month(year, month).await?;
    Ok(Json(calendar::month_grid(year, month, &events)))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    req.validate()?;

    let event = state
        .store
        .add_event(NewEvent {
            title: req.title,
            description: req.description,
            date: req.date,
            time: req.time,
            family_member_id: req.family_member_id,
            event_type: req.event_type.as_str().to_string(),
            is_all_day: req.is_all_day,
            external_calendar_id: req.external_calendar_id,
        })
        .await?;

    notify::publish(
        state.store.clone(),
        notify::event_added(&state.roster, &event),
    );

    Ok((StatusCode::CREATED, Json(event)))
}

/// Expand the recurrence and insert each date individually. Partial success
/// is reported, never rolled back.
pub async fn bulk_create_events(
    State(state): State<AppState>,
    Json(req): Json<BulkEventRequest>,
) -> ApiResult<(StatusCode, Json<BulkEventResponse>)> {
    req.validate()?;

    let payloads =
        recurrence::expand(&req).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let results = futures::future::join_all(
        payloads.into_iter().map(|p| state.store.add_event(p)),
    )
    .await;

    let mut created = 0;
    let mut failed = 0;
    for result in results {
        match result {
            Ok(event) => {
                created += 1;
                notify::publish(
                    state.store.clone(),
                    notify::event_added(&state.roster, &event),
                );
            }
            Err(e) => {
                failed += 1;
                tracing::error!("bulk event insert failed: {}", e);
            }
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(BulkEventResponse { created, failed }),
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> ApiResult<Json<Event>> {
    req.validate()?;

    let event = state
        .store
        .update_event(
            id,
            EventPatch {
                title: req.title,
                description: req.description,
                date: req.date,
                time: req.time,
                family_member_id: req.family_member_id,
                event_type: req.event_type.map(|t| t.as_str().to_string()),
                is_all_day: req.is_all_day,
                external_calendar_id: req.external_calendar_id,
            },
        )
        .await?;

    notify::publish(
        state.store.clone(),
        notify::event_updated(&state.roster, &event),
    );

    Ok(Json(event))
}

/// Drag-and-drop date reassignment. Dropping on the current date is a no-op
/// that returns the event unchanged.
pub async fn move_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveEventRequest>,
) -> ApiResult<Json<Event>> {
    req.validate()?;

    let existing = state
        .store
        .get_event(id)
        .await?
        .ok_or_else(|| ApiError::not_found("event"))?;

    let Some(op) = calendar::plan_move(std::slice::from_ref(&existing), id, &req.date) else {
        return Ok(Json(existing));
    };

    let event = state
        .store
        .update_event(
            op.id,
            EventPatch {
                date: Some(op.date),
                ..Default::default()
            },
        )
        .await?;

    notify::publish(
        state.store.clone(),
        notify::event_updated(&state.roster, &event),
    );

    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete_event(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
