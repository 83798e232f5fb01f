//! Lookup tables: species and breeds.

use sqlx::PgPool;

use crate::DbError;

/// A row from the `species` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SpeciesRow {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
}

/// A row from the `breeds` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BreedRow {
    pub id: i64,
    pub name: String,
    pub species_id: i64,
}

/// Returns all species, ordered by id (seed order).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_species(pool: &PgPool) -> Result<Vec<SpeciesRow>, DbError> {
    let rows = sqlx::query_as::<_, SpeciesRow>("SELECT id, name, icon FROM species ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Returns one species by exact name, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_species_by_name(pool: &PgPool, name: &str) -> Result<Option<SpeciesRow>, DbError> {
    let row = sqlx::query_as::<_, SpeciesRow>("SELECT id, name, icon FROM species WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Returns breeds, optionally filtered to one species.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_breeds(
    pool: &PgPool,
    species_id: Option<i64>,
) -> Result<Vec<BreedRow>, DbError> {
    let rows = if let Some(species_id) = species_id {
        sqlx::query_as::<_, BreedRow>(
            "SELECT id, name, species_id FROM breeds WHERE species_id = $1 ORDER BY id",
        )
        .bind(species_id)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, BreedRow>("SELECT id, name, species_id FROM breeds ORDER BY id")
            .fetch_all(pool)
            .await?
    };
    Ok(rows)
}
