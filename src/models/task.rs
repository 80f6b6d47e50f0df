use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A to-do item as stored in the database and returned by the API.
///
/// `owner_id` is assigned at creation from the authenticated caller and is
/// never changed afterwards; all queries over tasks are scoped by it.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: i32,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Identifier of the user who owns the task.
    pub owner_id: i32,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Input structure for updating a task.
///
/// All fields are optional; any field left unset keeps the task's current
/// persisted value. The merge with the existing row happens in the handler,
/// so the store always receives a complete (title, description, completed)
/// triple.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub completed: Option<bool>,
}
