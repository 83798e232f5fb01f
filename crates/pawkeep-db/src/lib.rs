use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;

use pawkeep_core::AppConfig;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/pawkeep-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }

}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect to a Postgres pool using explicit URL and config.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(database_url)
        .await
}

/// Run all pending migrations against the pool.
///
/// Returns the number of migrations that were applied.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<usize, sqlx::migrate::MigrateError> {
    // Count applied migrations before running. The _sqlx_migrations table may not
    // exist yet on a fresh database; treat absence as zero applied.
    let applied_before: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    MIGRATOR.run(pool).await?;

    let applied_after: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = true")
            .fetch_one(pool)
            .await
            .unwrap_or(0);

    let delta = (applied_after - applied_before).max(0);
    Ok(usize::try_from(delta).unwrap_or(0))
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Run a full health check: ping the pool and return a typed error on failure.
///
/// # Errors
///
/// Returns [`DbError`] if the ping fails.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    ping(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_has_sane_defaults() {
        let config = PoolConfig::default();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert_eq!(config.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS);
    }
}

pub mod bookings;
pub mod catalog;
pub mod community;
pub mod pets;
pub mod providers;
pub mod reminders;
pub mod seed;
pub mod users;
pub mod vaccinations;
pub mod vets;
pub mod weight_logs;

pub use bookings::{
    create_sitting_booking, create_walk_booking, list_sitting_bookings, list_walk_bookings,
    SittingBookingRow, WalkBookingRow,
};
pub use catalog::{get_species_by_name, list_breeds, list_species, BreedRow, SpeciesRow};
pub use community::{
    create_comment, create_feedback, create_post, delete_post_owned, get_post, like_count,
    list_comments, list_posts, toggle_like, CommentRow, FeedbackRow, LikeOutcome, PostRow,
    PostSummaryRow,
};
pub use pets::{
    create_pet, deactivate_pet, get_owned_pet, list_owned_pets, update_pet, NewPet, PetRow,
    PetUpdate,
};
pub use providers::{
    create_sitter, create_walker, get_active_sitter, get_active_walker, list_active_sitters,
    list_active_walkers, NewProvider, SitterRow, WalkerRow,
};
pub use seed::seed_defaults;

pub use reminders::{
    create_reminder, delete_reminder, get_reminder, list_due_reminders, list_reminders,
    update_reminder, CheckupReminderRow, NewReminder, ReminderUpdate,
};
pub use users::{
    count_users, create_user, get_user_by_email, get_user_by_id, update_user_profile, UserRow,
};
pub use vaccinations::{
    create_vaccination, delete_vaccination, get_vaccination, list_scheduled_vaccinations_due,
    list_vaccinations, update_vaccination, NewVaccination, VaccinationRow, VaccinationUpdate,
};
pub use vets::{create_vet, get_active_vet, list_active_vets, NewVet, VetRow};
pub use weight_logs::{create_weight_log, list_weight_logs, NewWeightLog, WeightLogRow};
