use sqlx::PgPool;

use crate::error::AppError;
use crate::models::User;

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, hashed_password FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, AppError> {
    let user =
        sqlx::query_as::<_, User>("SELECT id, email, hashed_password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    Ok(user)
}

/// Inserts a new user, returning the stored row.
///
/// A violation of the UNIQUE constraint on `email` is reported as
/// `AppError::Conflict`, the same error the signup pre-check produces, so
/// races between check and insert collapse into one failure mode.
pub async fn insert(
    pool: &PgPool,
    email: &str,
    hashed_password: &str,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, hashed_password) VALUES ($1, $2)
         RETURNING id, email, hashed_password",
    )
    .bind(email)
    .bind(hashed_password)
    .fetch_one(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Email already registered".into())
        }
        _ => e.into(),
    })?;

    Ok(user)
}
