//! Vaccination handlers. A row is either an administered record or a
//! scheduled appointment; the two creation routes set `is_scheduled`
//! accordingly.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, not_found, ApiError, ApiResponse, AppState, ResponseMeta};

fn default_true() -> bool {
    true
}

fn default_reminder_hours() -> i32 {
    24
}

#[derive(Debug, Deserialize)]
pub(super) struct RecordVaccinationRequest {
    pub pet_id: i64,
    pub vaccine_name: String,
    pub vaccine_type: String,
    pub date_administered: DateTime<Utc>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub veterinarian: Option<String>,
    pub batch_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ScheduleVaccinationRequest {
    pub pet_id: i64,
    pub vaccine_name: String,
    pub vaccine_type: String,
    pub scheduled_date: DateTime<Utc>,
    pub scheduled_time: Option<String>,
    pub location: Option<String>,
    pub vet_phone: Option<String>,
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub reminder_enabled: bool,
    #[serde(default = "default_reminder_hours")]
    pub reminder_hours: i32,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateVaccinationRequest {
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

#[derive(Debug, Deserialize)]
pub(super) struct VaccinationsQuery {
    pub pet_id: Option<i64>,
    pub is_scheduled: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(super) struct VaccinationItem {
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

impl From<pawkeep_db::VaccinationRow> for VaccinationItem {
    fn from(row: pawkeep_db::VaccinationRow) -> Self {
        Self {
            id: row.id,
            pet_id: row.pet_id,
            vaccine_name: row.vaccine_name,
            vaccine_type: row.vaccine_type,
            date_administered: row.date_administered,
            next_due_date: row.next_due_date,
            veterinarian: row.veterinarian,
            batch_number: row.batch_number,
            notes: row.notes,
            is_scheduled: row.is_scheduled,
            scheduled_date: row.scheduled_date,
            scheduled_time: row.scheduled_time,
            location: row.location,
            vet_phone: row.vet_phone,
            reminder_enabled: row.reminder_enabled,
            reminder_hours: row.reminder_hours,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedData {
    pub deleted: bool,
}

async fn resolve_owned_pet(
    state: &AppState,
    req_id: &str,
    pet_id: i64,
    user_id: i64,
) -> Result<(), ApiError> {
    pawkeep_db::get_owned_pet(&state.pool, pet_id, user_id)
        .await
        .map_err(|e| map_db_error(req_id.to_owned(), &e))?
        .ok_or_else(|| not_found(req_id.to_owned(), "pet"))?;
    Ok(())
}

fn validate_vaccine_name(req_id: &str, name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "vaccine_name must not be empty",
        ));
    }
    Ok(())
}

/// GET /api/v1/vaccinations?pet_id=&is_scheduled=
pub(super) async fn list_vaccinations(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<VaccinationsQuery>,
) -> Result<Json<ApiResponse<Vec<VaccinationItem>>>, ApiError> {
    let rows =
        pawkeep_db::list_vaccinations(&state.pool, user.0, query.pet_id, query.is_scheduled)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(VaccinationItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/vaccinations/{vaccination_id}
pub(super) async fn get_vaccination(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(vaccination_id): Path<i64>,
) -> Result<Json<ApiResponse<VaccinationItem>>, ApiError> {
    let row = pawkeep_db::get_vaccination(&state.pool, vaccination_id, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| not_found(req_id.0.clone(), "vaccination"))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/vaccinations/record — administered vaccination.
pub(super) async fn record_vaccination(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<RecordVaccinationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VaccinationItem>>), ApiError> {
    let rid = &req_id.0;
    validate_vaccine_name(rid, &body.vaccine_name)?;
    resolve_owned_pet(&state, rid, body.pet_id, user.0).await?;

    let new_vaccination = pawkeep_db::NewVaccination {
        pet_id: body.pet_id,
        vaccine_name: body.vaccine_name.trim().to_owned(),
        vaccine_type: body.vaccine_type,
        date_administered: Some(body.date_administered),
        next_due_date: body.next_due_date,
        veterinarian: body.veterinarian,
        batch_number: body.batch_number,
        notes: body.notes,
        is_scheduled: false,
        scheduled_date: None,
        scheduled_time: None,
        location: None,
        vet_phone: None,
        reminder_enabled: false,
        reminder_hours: 0,
    };

    let row = pawkeep_db::create_vaccination(&state.pool, &new_vaccination)
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

/// POST /api/v1/vaccinations/schedule — upcoming appointment.
pub(super) async fn schedule_vaccination(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<ScheduleVaccinationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VaccinationItem>>), ApiError> {
    let rid = &req_id.0;
    validate_vaccine_name(rid, &body.vaccine_name)?;
    resolve_owned_pet(&state, rid, body.pet_id, user.0).await?;

    let new_vaccination = pawkeep_db::NewVaccination {
        pet_id: body.pet_id,
        vaccine_name: body.vaccine_name.trim().to_owned(),
        vaccine_type: body.vaccine_type,
        date_administered: None,
        next_due_date: None,
        veterinarian: None,
        batch_number: None,
        notes: body.notes,
        is_scheduled: true,
        scheduled_date: Some(body.scheduled_date),
        scheduled_time: body.scheduled_time,
        location: body.location,
        vet_phone: body.vet_phone,
        reminder_enabled: body.reminder_enabled,
        reminder_hours: body.reminder_hours,
    };

    let row = pawkeep_db::create_vaccination(&state.pool, &new_vaccination)
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

/// PUT /api/v1/vaccinations/{vaccination_id} — sparse update.
pub(super) async fn update_vaccination(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(vaccination_id): Path<i64>,
    Json(body): Json<UpdateVaccinationRequest>,
) -> Result<Json<ApiResponse<VaccinationItem>>, ApiError> {
    let update = pawkeep_db::VaccinationUpdate {
        vaccine_name: body.vaccine_name,
        vaccine_type: body.vaccine_type,
        date_administered: body.date_administered,
        next_due_date: body.next_due_date,
        veterinarian: body.veterinarian,
        batch_number: body.batch_number,
        notes: body.notes,
        is_scheduled: body.is_scheduled,
        scheduled_date: body.scheduled_date,
        scheduled_time: body.scheduled_time,
        location: body.location,
        vet_phone: body.vet_phone,
        reminder_enabled: body.reminder_enabled,
        reminder_hours: body.reminder_hours,
    };

    let row = pawkeep_db::update_vaccination(&state.pool, vaccination_id, user.0, &update)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| not_found(req_id.0.clone(), "vaccination"))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/vaccinations/{vaccination_id}
pub(super) async fn delete_vaccination(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(vaccination_id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let deleted = pawkeep_db::delete_vaccination(&state.pool, vaccination_id, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(not_found(req_id.0.clone(), "vaccination"));
    }

    Ok(Json(ApiResponse {
        data: DeletedData { deleted: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}
