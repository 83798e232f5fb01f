//! Database operations for walk and sitting bookings.
//!
//! `total_cost` is computed by the caller at creation time and never changes
//! afterward, even if the provider's rate does.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `walk_bookings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WalkBookingRow {
    pub id: i64,
    pub pet_id: i64,
    pub walker_id: i64,
    pub scheduled_date: DateTime<Utc>,
    pub scheduled_time: String,
    pub duration_minutes: i32,
    pub total_cost: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `sitting_bookings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SittingBookingRow {
    pub id: i64,
    pub pet_id: i64,
    pub sitter_id: i64,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub total_cost: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns walk bookings for this user's pets, newest schedule first,
/// optionally filtered to one pet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_walk_bookings(
    pool: &PgPool,
    user_id: i64,
    pet_id: Option<i64>,
) -> Result<Vec<WalkBookingRow>, DbError> {
    let rows = sqlx::query_as::<_, WalkBookingRow>(
        "SELECT b.id, b.pet_id, b.walker_id, b.scheduled_date, b.scheduled_time, \
                b.duration_minutes, b.total_cost, b.notes, b.created_at, b.updated_at \
         FROM walk_bookings b \
         JOIN pets p ON p.id = b.pet_id \
         WHERE p.user_id = $1 \
           AND ($2::BIGINT IS NULL OR b.pet_id = $2) \
         ORDER BY b.scheduled_date DESC",
    )
    .bind(user_id)
    .bind(pet_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Inserts a walk booking with its frozen `total_cost`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
#[allow(clippy::too_many_arguments)] // one column per argument; no sensible grouping
pub async fn create_walk_booking(
    pool: &PgPool,
    pet_id: i64,
    walker_id: i64,
    scheduled_date: DateTime<Utc>,
    scheduled_time: &str,
    duration_minutes: i32,
    total_cost: f64,
    notes: Option<&str>,
) -> Result<WalkBookingRow, DbError> {
    let row = sqlx::query_as::<_, WalkBookingRow>(
        "INSERT INTO walk_bookings \
           (pet_id, walker_id, scheduled_date, scheduled_time, duration_minutes, total_cost, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id, pet_id, walker_id, scheduled_date, scheduled_time, duration_minutes, \
                   total_cost, notes, created_at, updated_at",
    )
    .bind(pet_id)
    .bind(walker_id)
    .bind(scheduled_date)
    .bind(scheduled_time)
    .bind(duration_minutes)
    .bind(total_cost)
    .bind(notes)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Returns sitting bookings for this user's pets, newest pickup first,
/// optionally filtered to one pet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_sitting_bookings(
    pool: &PgPool,
    user_id: i64,
    pet_id: Option<i64>,
) -> Result<Vec<SittingBookingRow>, DbError> {
    let rows = sqlx::query_as::<_, SittingBookingRow>(
        "SELECT b.id, b.pet_id, b.sitter_id, b.pickup_date, b.dropoff_date, \
                b.pickup_address, b.dropoff_address, b.total_cost, b.notes, \
                b.created_at, b.updated_at \
         FROM sitting_bookings b \
         JOIN pets p ON p.id = b.pet_id \
         WHERE p.user_id = $1 \
           AND ($2::BIGINT IS NULL OR b.pet_id = $2) \
         ORDER BY b.pickup_date DESC",
    )
    .bind(user_id)
    .bind(pet_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Inserts a sitting booking with its frozen `total_cost`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
#[allow(clippy::too_many_arguments)] // one column per argument; no sensible grouping
pub async fn create_sitting_booking(
    pool: &PgPool,
    pet_id: i64,
    sitter_id: i64,
    pickup_date: NaiveDate,
    dropoff_date: NaiveDate,
    pickup_address: &str,
    dropoff_address: &str,
    total_cost: f64,
    notes: Option<&str>,
) -> Result<SittingBookingRow, DbError> {
    let row = sqlx::query_as::<_, SittingBookingRow>(
        "INSERT INTO sitting_bookings \
           (pet_id, sitter_id, pickup_date, dropoff_date, pickup_address, dropoff_address, \
            total_cost, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id, pet_id, sitter_id, pickup_date, dropoff_date, pickup_address, \
                   dropoff_address, total_cost, notes, created_at, updated_at",
    )
    .bind(pet_id)
    .bind(sitter_id)
    .bind(pickup_date)
    .bind(dropoff_date)
    .bind(pickup_address)
    .bind(dropoff_address)
    .bind(total_cost)
    .bind(notes)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
