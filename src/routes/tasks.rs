//! Ownership-checked task CRUD handlers.
//!
//! Every route under `/users/{user_id}/tasks` follows the same contract:
//!
//! 1. The caller is resolved by `AuthMiddleware` (`CurrentUser` extractor).
//! 2. The path's `user_id` must equal the caller's id; a mismatch is a 403
//!    before any store access, so a foreign path never leaks whether a task
//!    exists.
//! 3. The store call receives the CALLER's id as the ownership filter, never
//!    the raw path id, so cross-user access stays impossible even if the
//!    path check were bypassed.
//! 4. A by-id miss is a 404 "Task not found".

use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{TaskCreate, TaskUpdate, User},
    store,
};

fn ensure_path_owner(user: &User, path_user_id: i32, action: &str) -> Result<(), AppError> {
    if user.id != path_user_id {
        return Err(AppError::Forbidden(format!(
            "Not authorized to {} tasks for this user",
            action
        )));
    }
    Ok(())
}

/// Creates a new task owned by the authenticated caller.
///
/// ## Responses:
/// - `200 OK`: Returns the newly created `Task` with `owner_id` set to the caller.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the path's user id is not the caller's.
/// - `422 Unprocessable Entity`: If input validation fails (e.g., empty title).
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    task_data: web::Json<TaskCreate>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    ensure_path_owner(&user.0, path.into_inner(), "create")?;

    let task = store::tasks::insert(
        &pool,
        &task_data.title,
        task_data.description.as_deref(),
        user.0.id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Lists all tasks owned by the authenticated caller.
///
/// There is no global task listing; the result is always scoped to the
/// caller's own tasks, ordered by id.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    path: web::Path<i32>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    ensure_path_owner(&user.0, path.into_inner(), "view")?;

    let tasks = store::tasks::find_by_owner(&pool, user.0.id).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a single task by id.
///
/// A task that exists but belongs to another user yields the same 404 as a
/// task that does not exist at all.
#[get("/{task_id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let (path_user_id, task_id) = path.into_inner();
    ensure_path_owner(&user.0, path_user_id, "view")?;

    let task = store::tasks::find_by_id(&pool, task_id, user.0.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Updates a task (partial update via full-resource PUT).
///
/// Fields left unset in the request are filled from the task's current
/// persisted values here in the handler, so the store always writes a
/// complete (title, description, completed) triple.
#[put("/{task_id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
    task_data: web::Json<TaskUpdate>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let (path_user_id, task_id) = path.into_inner();
    ensure_path_owner(&user.0, path_user_id, "update")?;

    let existing = store::tasks::find_by_id(&pool, task_id, user.0.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    let update = task_data.into_inner();
    let title = update.title.unwrap_or(existing.title);
    let description = update.description.or(existing.description);
    let completed = update.completed.unwrap_or(existing.completed);

    let task = store::tasks::update(
        &pool,
        task_id,
        user.0.id,
        &title,
        description.as_deref(),
        completed,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Flips a task's `completed` flag and returns the updated task.
///
/// Two consecutive toggles return the task to its original state.
#[patch("/{task_id}/complete")]
pub async fn toggle_task_completion(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let (path_user_id, task_id) = path.into_inner();
    ensure_path_owner(&user.0, path_user_id, "update")?;

    let task = store::tasks::toggle_completed(&pool, task_id, user.0.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `404 Not Found`: If the task is absent or not owned by the caller;
///   subsequent operations on the same id also 404.
#[delete("/{task_id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    path: web::Path<(i32, i32)>,
    user: CurrentUser,
) -> Result<impl Responder, AppError> {
    let (path_user_id, task_id) = path.into_inner();
    ensure_path_owner(&user.0, path_user_id, "delete")?;

    let deleted = store::tasks::delete(&pool, task_id, user.0.id).await?;
    if !deleted {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
