//! Database operations for the `weight_logs` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `weight_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeightLogRow {
    pub id: i64,
    pub pet_id: i64,
    pub weight_kg: f64,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub body_condition_score: Option<i32>,
    pub activity_level: Option<String>,
    pub feeding_amount: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWeightLog {
    pub pet_id: i64,
    pub weight_kg: f64,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub body_condition_score: Option<i32>,
    pub activity_level: Option<String>,
    pub feeding_amount: Option<String>,
}

const WEIGHT_LOG_COLUMNS: &str = "id, pet_id, weight_kg, recorded_at, notes, \
     body_condition_score, activity_level, feeding_amount, created_at, updated_at";

/// Returns weight logs for this user's pets ordered ascending by record date
/// (charting order), optionally filtered to one pet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_weight_logs(
    pool: &PgPool,
    user_id: i64,
    pet_id: Option<i64>,
) -> Result<Vec<WeightLogRow>, DbError> {
    let rows = sqlx::query_as::<_, WeightLogRow>(&format!(
        "SELECT w.{} FROM weight_logs w \
         JOIN pets p ON p.id = w.pet_id \
         WHERE p.user_id = $1 \
           AND ($2::BIGINT IS NULL OR w.pet_id = $2) \
         ORDER BY w.recorded_at",
        WEIGHT_LOG_COLUMNS.replace(", ", ", w.")
    ))
    .bind(user_id)
    .bind(pet_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Inserts a weight log and updates the pet's current weight to match, both
/// inside one transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; the transaction is
/// rolled back.
pub async fn create_weight_log(
    pool: &PgPool,
    log: &NewWeightLog,
) -> Result<WeightLogRow, DbError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, WeightLogRow>(&format!(
        "INSERT INTO weight_logs \
           (pet_id, weight_kg, recorded_at, notes, body_condition_score, \
            activity_level, feeding_amount) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {WEIGHT_LOG_COLUMNS}"
    ))
    .bind(log.pet_id)
    .bind(log.weight_kg)
    .bind(log.recorded_at)
    .bind(&log.notes)
    .bind(log.body_condition_score)
    .bind(&log.activity_level)
    .bind(&log.feeding_amount)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE pets SET weight_kg = $1, updated_at = NOW() WHERE id = $2")
        .bind(log.weight_kg)
        .bind(log.pet_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(row)
}
