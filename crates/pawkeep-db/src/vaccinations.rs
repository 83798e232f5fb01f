//! Database operations for the `vaccinations` table.
//!
//! A vaccination row is either an administered record (`is_scheduled = false`,
//! `date_administered` set) or a scheduled appointment (`is_scheduled = true`,
//! `scheduled_date` set).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `vaccinations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VaccinationRow {
    pub id: i64,
    pub pet_id: i64,
    pub vaccine_name: String,
    pub vaccine_type: String,
    pub date_administered: Option<DateTime<Utc>>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub veterinarian: Option<String>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
    pub is_scheduled: bool,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub location: Option<String>,
    pub vet_phone: Option<String>,
    pub reminder_enabled: bool,
    pub reminder_hours: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVaccination {
    pub pet_id: i64,
    pub vaccine_name: String,
    pub vaccine_type: String,
    pub date_administered: Option<DateTime<Utc>>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub veterinarian: Option<String>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
    pub is_scheduled: bool,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub location: Option<String>,
    pub vet_phone: Option<String>,
    pub reminder_enabled: bool,
    pub reminder_hours: i32,
}

/// Sparse update; `Some(v)` sets the field, `None` keeps the existing value.
#[derive(Debug, Clone, Default)]
pub struct VaccinationUpdate {
    pub vaccine_name: Option<String>,
    pub vaccine_type: Option<String>,
    pub date_administered: Option<DateTime<Utc>>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub veterinarian: Option<String>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
    pub is_scheduled: Option<bool>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub location: Option<String>,
    pub vet_phone: Option<String>,
    pub reminder_enabled: Option<bool>,
    pub reminder_hours: Option<i32>,
}

const VACCINATION_COLUMNS: &str = "id, pet_id, vaccine_name, vaccine_type, date_administered, \
     next_due_date, veterinarian, batch_number, notes, is_scheduled, scheduled_date, \
     scheduled_time, location, vet_phone, reminder_enabled, reminder_hours, created_at, updated_at";

/// Returns vaccinations for this user's pets, optionally filtered by pet and
/// scheduled/administered kind.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_vaccinations(
    pool: &PgPool,
    user_id: i64,
    pet_id: Option<i64>,
    is_scheduled: Option<bool>,
) -> Result<Vec<VaccinationRow>, DbError> {
    let rows = sqlx::query_as::<_, VaccinationRow>(&format!(
        "SELECT v.{} FROM vaccinations v \
         JOIN pets p ON p.id = v.pet_id \
         WHERE p.user_id = $1 \
           AND ($2::BIGINT IS NULL OR v.pet_id = $2) \
           AND ($3::BOOL IS NULL OR v.is_scheduled = $3) \
         ORDER BY v.created_at DESC",
        VACCINATION_COLUMNS.replace(", ", ", v.")
    ))
    .bind(user_id)
    .bind(pet_id)
    .bind(is_scheduled)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns one vaccination by id, only if the pet belongs to `user_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_vaccination(
    pool: &PgPool,
    vaccination_id: i64,
    user_id: i64,
) -> Result<Option<VaccinationRow>, DbError> {
    let row = sqlx::query_as::<_, VaccinationRow>(&format!(
        "SELECT v.{} FROM vaccinations v \
         JOIN pets p ON p.id = v.pet_id \
         WHERE v.id = $1 AND p.user_id = $2",
        VACCINATION_COLUMNS.replace(", ", ", v.")
    ))
    .bind(vaccination_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Inserts a vaccination row (administered record or scheduled appointment).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_vaccination(
    pool: &PgPool,
    vaccination: &NewVaccination,
) -> Result<VaccinationRow, DbError> {
    let row = sqlx::query_as::<_, VaccinationRow>(&format!(
        "INSERT INTO vaccinations \
           (pet_id, vaccine_name, vaccine_type, date_administered, next_due_date, \
            veterinarian, batch_number, notes, is_scheduled, scheduled_date, \
            scheduled_time, location, vet_phone, reminder_enabled, reminder_hours) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         RETURNING {VACCINATION_COLUMNS}"
    ))
    .bind(vaccination.pet_id)
    .bind(&vaccination.vaccine_name)
    .bind(&vaccination.vaccine_type)
    .bind(vaccination.date_administered)
    .bind(vaccination.next_due_date)
    .bind(&vaccination.veterinarian)
    .bind(&vaccination.batch_number)
    .bind(&vaccination.notes)
    .bind(vaccination.is_scheduled)
    .bind(vaccination.scheduled_date)
    .bind(&vaccination.scheduled_time)
    .bind(&vaccination.location)
    .bind(&vaccination.vet_phone)
    .bind(vaccination.reminder_enabled)
    .bind(vaccination.reminder_hours)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Applies a sparse update to a vaccination owned (through its pet) by
/// `user_id`. Returns `None` when no such row exists for this user.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_vaccination(
    pool: &PgPool,
    vaccination_id: i64,
    user_id: i64,
    update: &VaccinationUpdate,
) -> Result<Option<VaccinationRow>, DbError> {
    let row = sqlx::query_as::<_, VaccinationRow>(&format!(
        "UPDATE vaccinations v \
         SET vaccine_name      = COALESCE($3, v.vaccine_name), \
             vaccine_type      = COALESCE($4, v.vaccine_type), \
             date_administered = COALESCE($5, v.date_administered), \
             next_due_date     = COALESCE($6, v.next_due_date), \
             veterinarian      = COALESCE($7, v.veterinarian), \
             batch_number      = COALESCE($8, v.batch_number), \
             notes             = COALESCE($9, v.notes), \
             is_scheduled      = COALESCE($10, v.is_scheduled), \
             scheduled_date    = COALESCE($11, v.scheduled_date), \
             scheduled_time    = COALESCE($12, v.scheduled_time), \
             location          = COALESCE($13, v.location), \
             vet_phone         = COALESCE($14, v.vet_phone), \
             reminder_enabled  = COALESCE($15, v.reminder_enabled), \
             reminder_hours    = COALESCE($16, v.reminder_hours), \
             updated_at        = NOW() \
         FROM pets p \
         WHERE v.id = $1 AND p.id = v.pet_id AND p.user_id = $2 \
         RETURNING v.{}",
        VACCINATION_COLUMNS.replace(", ", ", v.")
    ))
    .bind(vaccination_id)
    .bind(user_id)
    .bind(&update.vaccine_name)
    .bind(&update.vaccine_type)
    .bind(update.date_administered)
    .bind(update.next_due_date)
    .bind(&update.veterinarian)
    .bind(&update.batch_number)
    .bind(&update.notes)
    .bind(update.is_scheduled)
    .bind(update.scheduled_date)
    .bind(&update.scheduled_time)
    .bind(&update.location)
    .bind(&update.vet_phone)
    .bind(update.reminder_enabled)
    .bind(update.reminder_hours)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Hard-deletes a vaccination owned (through its pet) by `user_id`. Returns
/// `true` if a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_vaccination(
    pool: &PgPool,
    vaccination_id: i64,
    user_id: i64,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "DELETE FROM vaccinations v \
         USING pets p \
         WHERE v.id = $1 AND p.id = v.pet_id AND p.user_id = $2",
    )
    .bind(vaccination_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Scheduled vaccinations for this user's pets due on or before `until`,
/// overdue ones included, joined with the pet name for alert rendering.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_scheduled_vaccinations_due(
    pool: &PgPool,
    user_id: i64,
    until: DateTime<Utc>,
) -> Result<Vec<(VaccinationRow, String)>, DbError> {
    #[derive(sqlx::FromRow)]
    struct DueRow {
        #[sqlx(flatten)]
        vaccination: VaccinationRow,
        pet_name: String,
    }

    let rows = sqlx::query_as::<_, DueRow>(&format!(
        "SELECT v.{}, p.name AS pet_name \
         FROM vaccinations v \
         JOIN pets p ON p.id = v.pet_id \
         WHERE p.user_id = $1 \
           AND v.is_scheduled = TRUE \
           AND v.scheduled_date IS NOT NULL \
           AND v.scheduled_date <= $2 \
         ORDER BY v.scheduled_date",
        VACCINATION_COLUMNS.replace(", ", ", v.")
    ))
    .bind(user_id)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| (r.vaccination, r.pet_name))
        .collect())
}
