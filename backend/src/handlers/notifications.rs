//! Notification endpoints: list, mark-read, and explicit pruning.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use shared::api::PruneResponse;
use shared::Notification;

use crate::error::ApiResult;
use crate::AppState;

/// Notifications older than this are eligible for pruning.
const PRUNE_AFTER_DAYS: i64 = 30;

pub async fn list_notifications(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = state.store.get_notifications().await?;
    Ok(Json(notifications))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Notification>> {
    let notification = state.store.mark_notification_read(id).await?;
    Ok(Json(notification))
}

/// Maintenance endpoint; nothing calls this on a schedule.
pub async fn prune(State(state): State<AppState>) -> ApiResult<Json<PruneResponse>> {
    let deleted = state.store.prune_notifications(PRUNE_AFTER_DAYS).await?;
    tracing::info!("Pruned {} notifications older than {} days", deleted, PRUNE_AFTER_DAYS);
    Ok(Json(PruneResponse { deleted }))
}
