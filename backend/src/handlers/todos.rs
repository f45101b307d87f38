//! Todo board endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use shared::api::{CreateTodoRequest, UpdateTodoRequest};
use shared::TodoItem;

use crate::error::ApiResult;
use crate::notify;
use crate::store::todos::{NewTodo, TodoPatch};
use crate::AppState;

pub async fn list_todos(State(state): State<AppState>) -> ApiResult<Json<Vec<TodoItem>>> {
    let todos = state.store.get_all_todos().await?;
    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Json(req): Json<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<TodoItem>)> {
    req.validate()?;

    let todo = state
        .store
        .add_todo(NewTodo {
            title: req.title,
            description: req.description,
            created_by: req.created_by,
            priority: req.priority.map(|p| p.as_str().to_string()),
        })
        .await?;

    notify::publish(
        state.store.clone(),
        notify::todo_added(&state.roster, &todo),
    );

    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTodoRequest>,
) -> ApiResult<Json<TodoItem>> {
    req.validate()?;

    let todo = state
        .store
        .update_todo(
            id,
            TodoPatch {
                title: req.title,
                description: req.description,
                completed: req.completed,
                priority: req.priority.map(|p| p.as_str().to_string()),
            },
        )
        .await?;

    notify::publish(
        state.store.clone(),
        notify::todo_updated(&state.roster, &todo),
    );

    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
