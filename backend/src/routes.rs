use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{changes, events, gcal, health, notifications, poi, settings, todos};
use crate::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Event routes
        .route("/events", get(events::list_events))
        .route("/events", post(events::create_event))
        .route("/events/bulk", post(events::bulk_create_events))
        .route("/events/month", get(events::list_events_by_month))
        .route("/events/:id", put(events::update_event))
        .route("/events/:id", delete(events::delete_event))
        .route("/events/:id/move", post(events::move_event))
        // Calendar view
        .route("/calendar/:year/:month", get(events::month_view))
        // Todo routes
        .route("/todos", get(todos::list_todos))
        .route("/todos", post(todos::create_todo))
        .route("/todos/:id", put(todos::update_todo))
        .route("/todos/:id", delete(todos::delete_todo))
        // Point activity routes
        .route("/poi/children", get(poi::list_children))
        .route("/poi/records", get(poi::list_records_by_month))
        .route("/poi/complete", post(poi::record_completion))
        // Notification routes
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .route("/notifications/prune", post(notifications::prune))
        // Live change stream
        .route("/changes", get(changes::change_stream))
        // Google Calendar sync
        .route("/gcal/auth-url", get(gcal::auth_url))
        .route("/gcal/callback", get(gcal::oauth_callback))
        .route("/gcal/sync", post(gcal::sync_event))
        // Settings
        .route("/settings", get(settings::get_settings))
        .route("/settings", put(settings::update_settings))
}
