//! Pet CRUD handlers, always scoped to the authenticated owner.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, not_found, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CreatePetRequest {
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

#[derive(Debug, Deserialize)]
pub(super) struct UpdatePetRequest {
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

#[derive(Debug, Serialize)]
pub(super) struct PetItem {
    pub id: i64,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<pawkeep_db::PetRow> for PetItem {
    fn from(row: pawkeep_db::PetRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            species: row.species,
            breed: row.breed,
            age_years: row.age_years,
            age_months: row.age_months,
            weight_kg: row.weight_kg,
            gender: row.gender,
            color: row.color,
            microchip_id: row.microchip_id,
            medical_notes: row.medical_notes,
            emergency_contact: row.emergency_contact,
            vet_name: row.vet_name,
            vet_phone: row.vet_phone,
            last_vaccination: row.last_vaccination,
            next_vaccination_due: row.next_vaccination_due,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedData {
    pub deleted: bool,
}

fn validate_pet_fields(
    req_id: &str,
    name: Option<&str>,
    age_years: Option<i32>,
    age_months: Option<i32>,
    weight_kg: Option<f64>,
) -> Result<(), ApiError> {
    if let Some(name) = name {
        if name.trim().is_empty() || name.len() > 100 {
            return Err(ApiError::new(
                req_id,
                "validation_error",
                "name must be 1–100 characters",
            ));
        }
    }
    if age_years.is_some_and(|y| y < 0) || age_months.is_some_and(|m| !(0..12).contains(&m)) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "age_years must be >= 0 and age_months in 0..12",
        ));
    }
    if weight_kg.is_some_and(|w| w <= 0.0 || !w.is_finite()) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "weight_kg must be a positive number",
        ));
    }
    Ok(())
}

/// GET /api/v1/pets — the caller's active pets.
pub(super) async fn list_pets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<PetItem>>>, ApiError> {
    let rows = pawkeep_db::list_owned_pets(&state.pool, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(PetItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/pets/{pet_id}
pub(super) async fn get_pet(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ApiResponse<PetItem>>, ApiError> {
    let row = pawkeep_db::get_owned_pet(&state.pool, pet_id, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| not_found(req_id.0.clone(), "pet"))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/pets
pub(super) async fn create_pet(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreatePetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PetItem>>), ApiError> {
    validate_pet_fields(
        &req_id.0,
        Some(&body.name),
        Some(body.age_years),
        Some(body.age_months),
        Some(body.weight_kg),
    )?;

    let new_pet = pawkeep_db::NewPet {
        name: body.name.trim().to_owned(),
        species: body.species,
        breed: body.breed,
        age_years: body.age_years,
        age_months: body.age_months,
        weight_kg: body.weight_kg,
        gender: body.gender,
        color: body.color,
        microchip_id: body.microchip_id,
        medical_notes: body.medical_notes,
        emergency_contact: body.emergency_contact,
        vet_name: body.vet_name,
        vet_phone: body.vet_phone,
    };

    let row = pawkeep_db::create_pet(&state.pool, user.0, &new_pet)
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

/// PUT /api/v1/pets/{pet_id} — sparse update.
pub(super) async fn update_pet(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(pet_id): Path<i64>,
    Json(body): Json<UpdatePetRequest>,
) -> Result<Json<ApiResponse<PetItem>>, ApiError> {
    validate_pet_fields(
        &req_id.0,
        body.name.as_deref(),
        body.age_years,
        body.age_months,
        body.weight_kg,
    )?;

    let update = pawkeep_db::PetUpdate {
        name: body.name.map(|n| n.trim().to_owned()),
        species: body.species,
        breed: body.breed,
        age_years: body.age_years,
        age_months: body.age_months,
        weight_kg: body.weight_kg,
        gender: body.gender,
        color: body.color,
        microchip_id: body.microchip_id,
        medical_notes: body.medical_notes,
        emergency_contact: body.emergency_contact,
        vet_name: body.vet_name,
        vet_phone: body.vet_phone,
    };

    let row = pawkeep_db::update_pet(&state.pool, pet_id, user.0, &update)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| not_found(req_id.0.clone(), "pet"))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/pets/{pet_id} — soft delete.
pub(super) async fn delete_pet(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(pet_id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let deleted = pawkeep_db::deactivate_pet(&state.pool, pet_id, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(not_found(req_id.0.clone(), "pet"));
    }

    Ok(Json(ApiResponse {
        data: DeletedData { deleted: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}
