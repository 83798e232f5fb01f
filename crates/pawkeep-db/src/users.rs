//! Database operations for the `users` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inserts a new user and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails (including unique email violations).
pub async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    phone: Option<&str>,
    password_hash: &str,
) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (name, email, phone, password_hash) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, name, email, phone, password_hash, created_at, updated_at",
    )
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Returns the user with the given email, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, phone, password_hash, created_at, updated_at \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Returns the user with the given id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_user_by_id(pool: &PgPool, user_id: i64) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, phone, password_hash, created_at, updated_at \
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Updates a user's profile. `Some(v)` sets the field, `None` keeps the
/// existing value.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_user_profile(
    pool: &PgPool,
    user_id: i64,
    name: Option<&str>,
    phone: Option<&str>,
) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "UPDATE users \
         SET name = COALESCE($2, name), \
             phone = COALESCE($3, phone), \
             updated_at = NOW() \
         WHERE id = $1 \
         RETURNING id, name, email, phone, password_hash, created_at, updated_at",
    )
    .bind(user_id)
    .bind(name)
    .bind(phone)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Total number of registered users.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_users(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
