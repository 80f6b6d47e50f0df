use sqlx::PgPool;

use crate::error::AppError;
use crate::models::Task;

pub async fn insert(
    pool: &PgPool,
    title: &str,
    description: Option<&str>,
    owner_id: i32,
) -> Result<Task, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (title, description, owner_id) VALUES ($1, $2, $3)
         RETURNING id, title, description, completed, owner_id",
    )
    .bind(title)
    .bind(description)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

pub async fn find_by_owner(pool: &PgPool, owner_id: i32) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT id, title, description, completed, owner_id FROM tasks
         WHERE owner_id = $1 ORDER BY id",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Fetches a task by id, scoped to its owner.
///
/// Returns `None` both when the task does not exist and when it belongs to a
/// different owner; callers cannot distinguish the two cases.
pub async fn find_by_id(
    pool: &PgPool,
    task_id: i32,
    owner_id: i32,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "SELECT id, title, description, completed, owner_id FROM tasks
         WHERE id = $1 AND owner_id = $2",
    )
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

/// Writes a complete (title, description, completed) triple to a task.
///
/// Partial-update merging is the handler's job; this function never receives
/// a sparse patch. Returns `None` when the task is absent or not owned.
pub async fn update(
    pool: &PgPool,
    task_id: i32,
    owner_id: i32,
    title: &str,
    description: Option<&str>,
    completed: bool,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks SET title = $1, description = $2, completed = $3
         WHERE id = $4 AND owner_id = $5
         RETURNING id, title, description, completed, owner_id",
    )
    .bind(title)
    .bind(description)
    .bind(completed)
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

/// Flips a task's `completed` flag in a single owner-filtered statement.
pub async fn toggle_completed(
    pool: &PgPool,
    task_id: i32,
    owner_id: i32,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks SET completed = NOT completed
         WHERE id = $1 AND owner_id = $2
         RETURNING id, title, description, completed, owner_id",
    )
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(task)
}

/// Deletes a task, returning whether a row was removed.
pub async fn delete(pool: &PgPool, task_id: i32, owner_id: i32) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
