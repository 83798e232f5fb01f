//! Database operations for the bookable provider rosters: `walkers` (hourly)
//! and `sitters` (daily boarding).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `walkers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WalkerRow {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub rate_per_hour: f64,
    pub rating: Option<f64>,
    pub categories: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `sitters` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SitterRow {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub rate_per_day: f64,
    pub rating: Option<f64>,
    pub categories: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields shared by walker and sitter creation; `rate` is per hour for
/// walkers and per day for sitters.
#[derive(Debug, Clone)]
pub struct NewProvider {
    pub name: String,
    pub bio: Option<String>,
    pub rate: f64,
    pub rating: Option<f64>,
    pub categories: Option<String>,
}

/// Returns all active walkers, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_walkers(pool: &PgPool) -> Result<Vec<WalkerRow>, DbError> {
    let rows = sqlx::query_as::<_, WalkerRow>(
        "SELECT id, name, bio, rate_per_hour, rating, categories, is_active, created_at, updated_at \
         FROM walkers WHERE is_active = TRUE ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns one active walker by id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_active_walker(pool: &PgPool, walker_id: i64) -> Result<Option<WalkerRow>, DbError> {
    let row = sqlx::query_as::<_, WalkerRow>(
        "SELECT id, name, bio, rate_per_hour, rating, categories, is_active, created_at, updated_at \
         FROM walkers WHERE id = $1 AND is_active = TRUE",
    )
    .bind(walker_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Inserts a walker and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_walker(pool: &PgPool, provider: &NewProvider) -> Result<WalkerRow, DbError> {
    let row = sqlx::query_as::<_, WalkerRow>(
        "INSERT INTO walkers (name, bio, rate_per_hour, rating, categories) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, name, bio, rate_per_hour, rating, categories, is_active, created_at, updated_at",
    )
    .bind(&provider.name)
    .bind(&provider.bio)
    .bind(provider.rate)
    .bind(provider.rating)
    .bind(&provider.categories)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Returns all active sitters, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_sitters(pool: &PgPool) -> Result<Vec<SitterRow>, DbError> {
    let rows = sqlx::query_as::<_, SitterRow>(
        "SELECT id, name, bio, rate_per_day, rating, categories, is_active, created_at, updated_at \
         FROM sitters WHERE is_active = TRUE ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns one active sitter by id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_active_sitter(pool: &PgPool, sitter_id: i64) -> Result<Option<SitterRow>, DbError> {
    let row = sqlx::query_as::<_, SitterRow>(
        "SELECT id, name, bio, rate_per_day, rating, categories, is_active, created_at, updated_at \
         FROM sitters WHERE id = $1 AND is_active = TRUE",
    )
    .bind(sitter_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Inserts a sitter and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_sitter(pool: &PgPool, provider: &NewProvider) -> Result<SitterRow, DbError> {
    let row = sqlx::query_as::<_, SitterRow>(
        "INSERT INTO sitters (name, bio, rate_per_day, rating, categories) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, name, bio, rate_per_day, rating, categories, is_active, created_at, updated_at",
    )
    .bind(&provider.name)
    .bind(&provider.bio)
    .bind(provider.rate)
    .bind(provider.rating)
    .bind(&provider.categories)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
