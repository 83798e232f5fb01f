//! Checkup reminder handlers. Ownership is enforced through the pet: the
//! reminder's pet must belong to the caller, otherwise the reminder does not
//! exist as far as they are concerned.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, not_found, ApiError, ApiResponse, AppState, ResponseMeta};

fn default_priority() -> String {
    "medium".to_string()
}

fn default_true() -> bool {
    true
}

fn default_reminder_hours() -> i32 {
    24
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateReminderRequest {
    pub pet_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub checkup_type: String,
    pub due_date: DateTime<Utc>,
    pub due_time: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    pub location: Option<String>,
    pub vet_name: Option<String>,
    pub vet_phone: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub reminder_enabled: bool,
    #[serde(default = "default_reminder_hours")]
    pub reminder_hours: i32,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateReminderRequest {
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

#[derive(Debug, Deserialize)]
pub(super) struct RemindersQuery {
    pub pet_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct ReminderItem {
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

impl From<pawkeep_db::CheckupReminderRow> for ReminderItem {
    fn from(row: pawkeep_db::CheckupReminderRow) -> Self {
        Self {
            id: row.id,
            pet_id: row.pet_id,
            title: row.title,
            description: row.description,
            checkup_type: row.checkup_type,
            due_date: row.due_date,
            due_time: row.due_time,
            priority: row.priority,
            location: row.location,
            vet_name: row.vet_name,
            vet_phone: row.vet_phone,
            notes: row.notes,
            reminder_enabled: row.reminder_enabled,
            reminder_hours: row.reminder_hours,
            is_completed: row.is_completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedData {
    pub deleted: bool,
}

/// GET /api/v1/checkup-reminders?pet_id=
pub(super) async fn list_reminders(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<RemindersQuery>,
) -> Result<Json<ApiResponse<Vec<ReminderItem>>>, ApiError> {
    let rows = pawkeep_db::list_reminders(&state.pool, user.0, query.pet_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ReminderItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/checkup-reminders/{reminder_id}
pub(super) async fn get_reminder(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(reminder_id): Path<i64>,
) -> Result<Json<ApiResponse<ReminderItem>>, ApiError> {
    let row = pawkeep_db::get_reminder(&state.pool, reminder_id, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| not_found(req_id.0.clone(), "reminder"))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/checkup-reminders
pub(super) async fn create_reminder(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateReminderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReminderItem>>), ApiError> {
    let rid = &req_id.0;
    if body.title.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "title must not be empty",
        ));
    }

    // Resolve the pet under the caller before writing anything.
    pawkeep_db::get_owned_pet(&state.pool, body.pet_id, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| not_found(rid.clone(), "pet"))?;

    let new_reminder = pawkeep_db::NewReminder {
        pet_id: body.pet_id,
        title: body.title.trim().to_owned(),
        description: body.description,
        checkup_type: body.checkup_type,
        due_date: body.due_date,
        due_time: body.due_time,
        priority: body.priority,
        location: body.location,
        vet_name: body.vet_name,
        vet_phone: body.vet_phone,
        notes: body.notes,
        reminder_enabled: body.reminder_enabled,
        reminder_hours: body.reminder_hours,
    };

    let row = pawkeep_db::create_reminder(&state.pool, &new_reminder)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: row.into(),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/checkup-reminders/{reminder_id} — sparse update.
pub(super) async fn update_reminder(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(reminder_id): Path<i64>,
    Json(body): Json<UpdateReminderRequest>,
) -> Result<Json<ApiResponse<ReminderItem>>, ApiError> {
    let update = pawkeep_db::ReminderUpdate {
        title: body.title,
        description: body.description,
        checkup_type: body.checkup_type,
        due_date: body.due_date,
        due_time: body.due_time,
        priority: body.priority,
        location: body.location,
        vet_name: body.vet_name,
        vet_phone: body.vet_phone,
        notes: body.notes,
        reminder_enabled: body.reminder_enabled,
        reminder_hours: body.reminder_hours,
        is_completed: body.is_completed,
    };

    let row = pawkeep_db::update_reminder(&state.pool, reminder_id, user.0, &update)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| not_found(req_id.0.clone(), "reminder"))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/checkup-reminders/{reminder_id}
pub(super) async fn delete_reminder(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(reminder_id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let deleted = pawkeep_db::delete_reminder(&state.pool, reminder_id, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(not_found(req_id.0.clone(), "reminder"));
    }

    Ok(Json(ApiResponse {
        data: DeletedData { deleted: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}
