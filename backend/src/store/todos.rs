use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use shared::TodoItem;
use uuid::Uuid;

use super::{ChangeKind, Collection, Store, StoreResult};

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub created_by: String,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
}

impl Store {
    pub async fn add_todo(&self, new: NewTodo) -> StoreResult<TodoItem> {
        use crate::schema::todos::dsl::*;

        let mut conn = self.conn().await?;

        let row: TodoItem = diesel::insert_into(todos)
            .values((
                id.eq(Uuid::new_v4()),
                title.eq(&new.title),
                description.eq(new.description.as_deref()),
                completed.eq(false),
                created_by.eq(&new.created_by),
                priority.eq(new.priority.as_deref()),
            ))
            .get_result(&mut conn)
            .await?;

        self.publish(Collection::Todos, ChangeKind::Added, row.id.to_string());
        Ok(row)
    }

    pub async fn get_all_todos(&self) -> StoreResult<Vec<TodoItem>> {
        use crate::schema::todos::dsl::*;

        let Some(mut conn) = self.read_conn().await? else {
            return Ok(Vec::new());
        };

        let items = todos
            .order_by(created_at.desc())
            .load::<TodoItem>(&mut conn)
            .await?;

        Ok(items)
    }

    pub async fn update_todo(&self, todo_id: Uuid, patch: TodoPatch) -> StoreResult<TodoItem> {
        use crate::schema::todos::dsl::*;

        let mut conn = self.conn().await?;

        if let Some(t) = patch.title {
            diesel::update(todos.filter(id.eq(todo_id)))
                .set(title.eq(t))
                .execute(&mut conn)
                .await?;
        }
        if let Some(d) = patch.description {
            diesel::update(todos.filter(id.eq(todo_id)))
                .set(description.eq(Some(d)))
                .execute(&mut conn)
                .await?;
        }
        if let Some(c) = patch.completed {
            diesel::update(todos.filter(id.eq(todo_id)))
                .set(completed.eq(c))
                .execute(&mut conn)
                .await?;
        }
        if let Some(p) = patch.priority {
            diesel::update(todos.filter(id.eq(todo_id)))
                .set(priority.eq(Some(p)))
                .execute(&mut conn)
                .await?;
        }

        let updated: TodoItem = diesel::update(todos.filter(id.eq(todo_id)))
            .set(updated_at.eq(Utc::now()))
            .get_result(&mut conn)
            .await?;

        self.publish(Collection::Todos, ChangeKind::Updated, updated.id.to_string());
        Ok(updated)
    }

    pub async fn delete_todo(&self, todo_id: Uuid) -> StoreResult<()> {
        use crate::schema::todos::dsl::*;

        let mut conn = self.conn().await?;

        diesel::delete(todos.filter(id.eq(todo_id)))
            .execute(&mut conn)
            .await?;

        self.publish(Collection::Todos, ChangeKind::Deleted, todo_id.to_string());
        Ok(())
    }
}
