//! Database operations for the `pets` table.
//!
//! Every read and write is scoped by `user_id`: a pet that belongs to another
//! user is indistinguishable from a pet that does not exist. Deletion is a
//! soft-delete (`is_active = false`).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `pets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PetRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age_years: i32,
    pub age_months: i32,
    pub weight_kg: f64,
    pub gender: String,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub medical_notes: Option<String>,
    pub emergency_contact: Option<String>,
    pub vet_name: Option<String>,
    pub vet_phone: Option<String>,
    pub last_vaccination: Option<DateTime<Utc>>,
    pub next_vaccination_due: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a pet.
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age_years: i32,
    pub age_months: i32,
    pub weight_kg: f64,
    pub gender: String,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub medical_notes: Option<String>,
    pub emergency_contact: Option<String>,
    pub vet_name: Option<String>,
    pub vet_phone: Option<String>,
}

/// Sparse update; `Some(v)` sets the field, `None` keeps the existing value.
#[derive(Debug, Clone, Default)]
pub struct PetUpdate {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub age_years: Option<i32>,
    pub age_months: Option<i32>,
    pub weight_kg: Option<f64>,
    pub gender: Option<String>,
    pub color: Option<String>,
    pub microchip_id: Option<String>,
    pub medical_notes: Option<String>,
    pub emergency_contact: Option<String>,
    pub vet_name: Option<String>,
    pub vet_phone: Option<String>,
}

const PET_COLUMNS: &str = "id, user_id, name, species, breed, age_years, age_months, weight_kg, \
     gender, color, microchip_id, medical_notes, emergency_contact, vet_name, vet_phone, \
     last_vaccination, next_vaccination_due, is_active, created_at, updated_at";

/// Returns all active pets belonging to `user_id`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_owned_pets(pool: &PgPool, user_id: i64) -> Result<Vec<PetRow>, DbError> {
    let rows = sqlx::query_as::<_, PetRow>(&format!(
        "SELECT {PET_COLUMNS} FROM pets \
         WHERE user_id = $1 AND is_active = TRUE \
         ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns a single active pet by id, only if it belongs to `user_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_owned_pet(
    pool: &PgPool,
    pet_id: i64,
    user_id: i64,
) -> Result<Option<PetRow>, DbError> {
    let row = sqlx::query_as::<_, PetRow>(&format!(
        "SELECT {PET_COLUMNS} FROM pets \
         WHERE id = $1 AND user_id = $2 AND is_active = TRUE"
    ))
    .bind(pet_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Inserts a new pet for `user_id` and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_pet(pool: &PgPool, user_id: i64, pet: &NewPet) -> Result<PetRow, DbError> {
    let row = sqlx::query_as::<_, PetRow>(&format!(
        "INSERT INTO pets \
           (user_id, name, species, breed, age_years, age_months, weight_kg, gender, \
            color, microchip_id, medical_notes, emergency_contact, vet_name, vet_phone) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         RETURNING {PET_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&pet.name)
    .bind(&pet.species)
    .bind(&pet.breed)
    .bind(pet.age_years)
    .bind(pet.age_months)
    .bind(pet.weight_kg)
    .bind(&pet.gender)
    .bind(&pet.color)
    .bind(&pet.microchip_id)
    .bind(&pet.medical_notes)
    .bind(&pet.emergency_contact)
    .bind(&pet.vet_name)
    .bind(&pet.vet_phone)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Applies a sparse update to an owned, active pet. Returns `None` if no such
/// pet exists for this user.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_pet(
    pool: &PgPool,
    pet_id: i64,
    user_id: i64,
    update: &PetUpdate,
) -> Result<Option<PetRow>, DbError> {
    let row = sqlx::query_as::<_, PetRow>(&format!(
        "UPDATE pets \
         SET name              = COALESCE($3, name), \
             species           = COALESCE($4, species), \
             breed             = COALESCE($5, breed), \
             age_years         = COALESCE($6, age_years), \
             age_months        = COALESCE($7, age_months), \
             weight_kg         = COALESCE($8, weight_kg), \
             gender            = COALESCE($9, gender), \
             color             = COALESCE($10, color), \
             microchip_id      = COALESCE($11, microchip_id), \
             medical_notes     = COALESCE($12, medical_notes), \
             emergency_contact = COALESCE($13, emergency_contact), \
             vet_name          = COALESCE($14, vet_name), \
             vet_phone         = COALESCE($15, vet_phone), \
             updated_at        = NOW() \
         WHERE id = $1 AND user_id = $2 AND is_active = TRUE \
         RETURNING {PET_COLUMNS}"
    ))
    .bind(pet_id)
    .bind(user_id)
    .bind(&update.name)
    .bind(&update.species)
    .bind(&update.breed)
    .bind(update.age_years)
    .bind(update.age_months)
    .bind(update.weight_kg)
    .bind(&update.gender)
    .bind(&update.color)
    .bind(&update.microchip_id)
    .bind(&update.medical_notes)
    .bind(&update.emergency_contact)
    .bind(&update.vet_name)
    .bind(&update.vet_phone)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Soft-deletes an owned, active pet. Returns `true` if a row was updated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn deactivate_pet(pool: &PgPool, pet_id: i64, user_id: i64) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE pets \
         SET is_active = FALSE, updated_at = NOW() \
         WHERE id = $1 AND user_id = $2 AND is_active = TRUE",
    )
    .bind(pet_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
