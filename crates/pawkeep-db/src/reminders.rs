//! Database operations for the `checkup_reminders` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `checkup_reminders` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CheckupReminderRow {
    pub id: i64,
    pub pet_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub checkup_type: String,
    pub due_date: DateTime<Utc>,
    pub due_time: String,
    pub priority: String,
    pub location: Option<String>,
    pub vet_name: Option<String>,
    pub vet_phone: Option<String>,
    pub notes: Option<String>,
    pub reminder_enabled: bool,
    pub reminder_hours: i32,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReminder {
    pub pet_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub checkup_type: String,
    pub due_date: DateTime<Utc>,
    pub due_time: String,
    pub priority: String,
    pub location: Option<String>,
    pub vet_name: Option<String>,
    pub vet_phone: Option<String>,
    pub notes: Option<String>,
    pub reminder_enabled: bool,
    pub reminder_hours: i32,
}

/// Sparse update; `Some(v)` sets the field, `None` keeps the existing value.
#[derive(Debug, Clone, Default)]
pub struct ReminderUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub checkup_type: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub due_time: Option<String>,
    pub priority: Option<String>,
    pub location: Option<String>,
    pub vet_name: Option<String>,
    pub vet_phone: Option<String>,
    pub notes: Option<String>,
    pub reminder_enabled: Option<bool>,
    pub reminder_hours: Option<i32>,
    pub is_completed: Option<bool>,
}

const REMINDER_COLUMNS: &str = "id, pet_id, title, description, checkup_type, due_date, due_time, \
     priority, location, vet_name, vet_phone, notes, reminder_enabled, reminder_hours, \
     is_completed, created_at, updated_at";

/// Returns reminders for pets owned by `user_id`, optionally filtered to one pet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reminders(
    pool: &PgPool,
    user_id: i64,
    pet_id: Option<i64>,
) -> Result<Vec<CheckupReminderRow>, DbError> {
    let rows = if let Some(pet_id) = pet_id {
        sqlx::query_as::<_, CheckupReminderRow>(&format!(
            "SELECT r.{} FROM checkup_reminders r \
             JOIN pets p ON p.id = r.pet_id \
             WHERE p.user_id = $1 AND r.pet_id = $2 \
             ORDER BY r.due_date",
            REMINDER_COLUMNS.replace(", ", ", r.")
        ))
        .bind(user_id)
        .bind(pet_id)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, CheckupReminderRow>(&format!(
            "SELECT r.{} FROM checkup_reminders r \
             JOIN pets p ON p.id = r.pet_id \
             WHERE p.user_id = $1 \
             ORDER BY r.due_date",
            REMINDER_COLUMNS.replace(", ", ", r.")
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?
    };
    Ok(rows)
}

/// Returns one reminder by id, only if the pet belongs to `user_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_reminder(
    pool: &PgPool,
    reminder_id: i64,
    user_id: i64,
) -> Result<Option<CheckupReminderRow>, DbError> {
    let row = sqlx::query_as::<_, CheckupReminderRow>(&format!(
        "SELECT r.{} FROM checkup_reminders r \
         JOIN pets p ON p.id = r.pet_id \
         WHERE r.id = $1 AND p.user_id = $2",
        REMINDER_COLUMNS.replace(", ", ", r.")
    ))
    .bind(reminder_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Inserts a new checkup reminder and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_reminder(
    pool: &PgPool,
    reminder: &NewReminder,
) -> Result<CheckupReminderRow, DbError> {
    let row = sqlx::query_as::<_, CheckupReminderRow>(&format!(
        "INSERT INTO checkup_reminders \
           (pet_id, title, description, checkup_type, due_date, due_time, priority, \
            location, vet_name, vet_phone, notes, reminder_enabled, reminder_hours) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING {REMINDER_COLUMNS}"
    ))
    .bind(reminder.pet_id)
    .bind(&reminder.title)
    .bind(&reminder.description)
    .bind(&reminder.checkup_type)
    .bind(reminder.due_date)
    .bind(&reminder.due_time)
    .bind(&reminder.priority)
    .bind(&reminder.location)
    .bind(&reminder.vet_name)
    .bind(&reminder.vet_phone)
    .bind(&reminder.notes)
    .bind(reminder.reminder_enabled)
    .bind(reminder.reminder_hours)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Applies a sparse update to a reminder owned (through its pet) by `user_id`.
/// Returns `None` when the reminder does not exist for this user.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_reminder(
    pool: &PgPool,
    reminder_id: i64,
    user_id: i64,
    update: &ReminderUpdate,
) -> Result<Option<CheckupReminderRow>, DbError> {
    let row = sqlx::query_as::<_, CheckupReminderRow>(&format!(
        "UPDATE checkup_reminders r \
         SET title            = COALESCE($3, r.title), \
             description      = COALESCE($4, r.description), \
             checkup_type     = COALESCE($5, r.checkup_type), \
             due_date         = COALESCE($6, r.due_date), \
             due_time         = COALESCE($7, r.due_time), \
             priority         = COALESCE($8, r.priority), \
             location         = COALESCE($9, r.location), \
             vet_name         = COALESCE($10, r.vet_name), \
             vet_phone        = COALESCE($11, r.vet_phone), \
             notes            = COALESCE($12, r.notes), \
             reminder_enabled = COALESCE($13, r.reminder_enabled), \
             reminder_hours   = COALESCE($14, r.reminder_hours), \
             is_completed     = COALESCE($15, r.is_completed), \
             updated_at       = NOW() \
         FROM pets p \
         WHERE r.id = $1 AND p.id = r.pet_id AND p.user_id = $2 \
         RETURNING r.{}",
        REMINDER_COLUMNS.replace(", ", ", r.")
    ))
    .bind(reminder_id)
    .bind(user_id)
    .bind(&update.title)
    .bind(&update.description)
    .bind(&update.checkup_type)
    .bind(update.due_date)
    .bind(&update.due_time)
    .bind(&update.priority)
    .bind(&update.location)
    .bind(&update.vet_name)
    .bind(&update.vet_phone)
    .bind(&update.notes)
    .bind(update.reminder_enabled)
    .bind(update.reminder_hours)
    .bind(update.is_completed)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Hard-deletes a reminder owned (through its pet) by `user_id`. Returns
/// `true` if a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_reminder(
    pool: &PgPool,
    reminder_id: i64,
    user_id: i64,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "DELETE FROM checkup_reminders r \
         USING pets p \
         WHERE r.id = $1 AND p.id = r.pet_id AND p.user_id = $2",
    )
    .bind(reminder_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Incomplete reminders for this user's pets due on or before `until`,
/// overdue ones included, joined with the pet name for alert rendering.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_due_reminders(
    pool: &PgPool,
    user_id: i64,
    until: DateTime<Utc>,
) -> Result<Vec<(CheckupReminderRow, String)>, DbError> {
    #[derive(sqlx::FromRow)]
    struct DueRow {
        #[sqlx(flatten)]
        reminder: CheckupReminderRow,
        pet_name: String,
    }

    let rows = sqlx::query_as::<_, DueRow>(&format!(
        "SELECT r.{}, p.name AS pet_name \
         FROM checkup_reminders r \
         JOIN pets p ON p.id = r.pet_id \
         WHERE p.user_id = $1 \
           AND r.is_completed = FALSE \
           AND r.due_date <= $2 \
         ORDER BY r.due_date",
        REMINDER_COLUMNS.replace(", ", ", r.")
    ))
    .bind(user_id)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| (r.reminder, r.pet_name)).collect())
}
