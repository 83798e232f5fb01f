//! Database operations for the `vets` table.
//!
//! Vets are the only providers with coordinates; the proximity search in
//! `pawkeep-core` ranks the rows returned by [`list_active_vets`].

use chrono::{DateTime, Utc};
use pawkeep_core::{GeoPoint, Locatable};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `vets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VetRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub reviews_count: i32,
    pub is_open: bool,
    pub is_emergency: bool,
    pub specialties: serde_json::Value,
    pub hours: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Locatable for VetRow {
    fn position(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.latitude, self.longitude))
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

#[derive(Debug, Clone)]
pub struct NewVet {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub reviews_count: i32,
    pub is_open: bool,
    pub is_emergency: bool,
    pub specialties: serde_json::Value,
    pub hours: Option<String>,
    pub website: Option<String>,
}

const VET_COLUMNS: &str = "id, name, address, phone, latitude, longitude, rating, reviews_count, \
     is_open, is_emergency, specialties, hours, website, is_active, created_at, updated_at";

/// Returns all active vets, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_vets(pool: &PgPool) -> Result<Vec<VetRow>, DbError> {
    let rows = sqlx::query_as::<_, VetRow>(&format!(
        "SELECT {VET_COLUMNS} FROM vets WHERE is_active = TRUE ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns one active vet by id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_active_vet(pool: &PgPool, vet_id: i64) -> Result<Option<VetRow>, DbError> {
    let row = sqlx::query_as::<_, VetRow>(&format!(
        "SELECT {VET_COLUMNS} FROM vets WHERE id = $1 AND is_active = TRUE"
    ))
    .bind(vet_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Inserts a vet and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_vet(pool: &PgPool, vet: &NewVet) -> Result<VetRow, DbError> {
    let row = sqlx::query_as::<_, VetRow>(&format!(
        "INSERT INTO vets \
           (name, address, phone, latitude, longitude, rating, reviews_count, \
            is_open, is_emergency, specialties, hours, website) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
         RETURNING {VET_COLUMNS}"
    ))
    .bind(&vet.name)
    .bind(&vet.address)
    .bind(&vet.phone)
    .bind(vet.latitude)
    .bind(vet.longitude)
    .bind(vet.rating)
    .bind(vet.reviews_count)
    .bind(vet.is_open)
    .bind(vet.is_emergency)
    .bind(&vet.specialties)
    .bind(&vet.hours)
    .bind(&vet.website)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
