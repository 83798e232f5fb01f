//! Vet roster, creation, and proximity search handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use pawkeep_core::{format_distance, search_nearby, GeoPoint};

use crate::middleware::RequestId;

use super::{map_db_error, not_found, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Deserialize)]
pub(super) struct VetSearchQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateVetRequest {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews_count: i32,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default)]
    pub is_emergency: bool,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub hours: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct VetItem {
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
}

impl From<pawkeep_db::VetRow> for VetItem {
    fn from(row: pawkeep_db::VetRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            latitude: row.latitude,
            longitude: row.longitude,
            rating: row.rating,
            reviews_count: row.reviews_count,
            is_open: row.is_open,
            is_emergency: row.is_emergency,
            specialties: row.specialties,
            hours: row.hours,
            website: row.website,
        }
    }
}

/// A vet annotated with its distance from the search origin.
#[derive(Debug, Serialize)]
pub(super) struct VetSearchItem {
    #[serde(flatten)]
    pub vet: VetItem,
    pub distance_km: f64,
    pub distance_text: String,
}

fn validate_coordinates(req_id: &str, latitude: f64, longitude: f64) -> Result<(), ApiError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(ApiError::new(
            req_id,
            "unprocessable",
            format!("coordinates out of range: ({latitude}, {longitude})"),
        ));
    }
    Ok(())
}

/// GET /api/v1/vets
pub(super) async fn list_vets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<VetItem>>>, ApiError> {
    let rows = pawkeep_db::list_active_vets(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(VetItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/vets/{vet_id}
pub(super) async fn get_vet(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(vet_id): Path<i64>,
) -> Result<Json<ApiResponse<VetItem>>, ApiError> {
    let row = pawkeep_db::get_active_vet(&state.pool, vet_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| not_found(req_id.0.clone(), "vet"))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/vets/search?latitude=&longitude=&radius_km=&limit=
///
/// An empty result set is a valid 200; out-of-range coordinates are a 422.
pub(super) async fn search_vets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<VetSearchQuery>,
) -> Result<Json<ApiResponse<Vec<VetSearchItem>>>, ApiError> {
    validate_coordinates(&req_id.0, query.latitude, query.longitude)?;

    let rows = pawkeep_db::list_active_vets(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let origin = GeoPoint::new(query.latitude, query.longitude);
    let radius_km = query.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    let limit = query
        .limit
        .map_or(pawkeep_core::geo::DEFAULT_SEARCH_LIMIT, |l| {
            usize::try_from(l).unwrap_or(0)
        });

    let data = search_nearby(origin, radius_km, limit, &rows)
        .into_iter()
        .map(|(vet, distance_km)| VetSearchItem {
            vet: vet.clone().into(),
            distance_km,
            distance_text: format_distance(distance_km),
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/vets — administrative creation.
pub(super) async fn create_vet(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateVetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VetItem>>), ApiError> {
    let rid = &req_id.0;
    if body.name.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "name must not be empty",
        ));
    }
    validate_coordinates(rid, body.latitude, body.longitude)?;

    let new_vet = pawkeep_db::NewVet {
        name: body.name.trim().to_owned(),
        address: body.address,
        phone: body.phone,
        latitude: body.latitude,
        longitude: body.longitude,
        rating: body.rating,
        reviews_count: body.reviews_count,
        is_open: body.is_open,
        is_emergency: body.is_emergency,
        specialties: serde_json::json!(body.specialties),
        hours: body.hours,
        website: body.website,
    };

    let row = pawkeep_db::create_vet(&state.pool, &new_vet)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_validation_accepts_boundaries() {
        assert!(validate_coordinates("r", 90.0, 180.0).is_ok());
        assert!(validate_coordinates("r", -90.0, -180.0).is_ok());
    }

    #[test]
    fn coordinate_validation_rejects_out_of_range() {
        assert!(validate_coordinates("r", 90.1, 0.0).is_err());
        assert!(validate_coordinates("r", 0.0, -180.5).is_err());
    }
}
