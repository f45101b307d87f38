//! Point-activity endpoints: child balances, monthly records, and task
//! completion.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use shared::api::{MonthQuery, RecordCompletionRequest, RecordCompletionResponse};
use shared::{PoiChild, PoiRecord};

use crate::error::ApiResult;
use crate::ledger;
use crate::notify;
use crate::AppState;

pub async fn list_children(State(state): State<AppState>) -> ApiResult<Json<Vec<PoiChild>>> {
    let children = state.store.get_poi_children().await?;
    Ok(Json(children))
}

pub async fn list_records_by_month(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<Vec<PoiRecord>>> {
    let records = state
        .store
        .get_poi_records_by_month(query.year, query.month)
        .await?;
    Ok(Json(records))
}

pub async fn record_completion(
    State(state): State<AppState>,
    Json(req): Json<RecordCompletionRequest>,
) -> ApiResult<(StatusCode, Json<RecordCompletionResponse>)> {
    req.validate()?;

    let (child, record) = ledger::record_completion(
        state.store.as_ref(),
        &state.roster,
        &req.child_id,
        &req.task_name,
        req.points,
    )
    .await?;

    notify::publish(state.store.clone(), notify::poi_added(&child.name, &record));

    Ok((
        StatusCode::CREATED,
        Json(RecordCompletionResponse { child, record }),
    ))
}
