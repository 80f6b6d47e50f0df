//! Database bootstrapping: connection pool construction and the one-shot
//! table-creation step run at startup.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Creates the `users` and `tasks` tables if they do not exist.
///
/// The UNIQUE constraint on `users.email` is the authoritative guard against
/// duplicate registrations; the signup handler's pre-check is advisory only.
pub async fn create_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
             id SERIAL PRIMARY KEY,
             email TEXT NOT NULL UNIQUE,
             hashed_password TEXT NOT NULL
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS tasks (
             id SERIAL PRIMARY KEY,
             title TEXT NOT NULL,
             description TEXT,
             completed BOOLEAN NOT NULL DEFAULT FALSE,
             owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
         )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
