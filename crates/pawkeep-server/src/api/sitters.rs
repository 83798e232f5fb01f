//! Sitter roster and sitting booking handlers.
//!
//! A sitting stay is billed per calendar day with a minimum of one day; the
//! date span is validated before any cost computation or persistence.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use pawkeep_core::estimate_daily;

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, not_found, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CreateSitterRequest {
    pub name: String,
    pub bio: Option<String>,
    pub rate_per_day: f64,
    pub rating: Option<f64>,
    pub categories: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateSittingBookingRequest {
    pub pet_id: i64,
    pub sitter_id: i64,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SittingBookingsQuery {
    pub pet_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct SitterItem {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub rate_per_day: f64,
    pub rating: Option<f64>,
    pub categories: Option<String>,
}

impl From<pawkeep_db::SitterRow> for SitterItem {
    fn from(row: pawkeep_db::SitterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            bio: row.bio,
            rate_per_day: row.rate_per_day,
            rating: row.rating,
            categories: row.categories,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SittingBookingItem {
    pub id: i64,
    pub pet_id: i64,
    pub sitter_id: i64,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub total_cost: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<pawkeep_db::SittingBookingRow> for SittingBookingItem {
    fn from(row: pawkeep_db::SittingBookingRow) -> Self {
        Self {
            id: row.id,
            pet_id: row.pet_id,
            sitter_id: row.sitter_id,
            pickup_date: row.pickup_date,
            dropoff_date: row.dropoff_date,
            pickup_address: row.pickup_address,
            dropoff_address: row.dropoff_address,
            total_cost: row.total_cost,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// GET /api/v1/sitters
pub(super) async fn list_sitters(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<SitterItem>>>, ApiError> {
    let rows = pawkeep_db::list_active_sitters(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(SitterItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/sitters
pub(super) async fn create_sitter(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateSitterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SitterItem>>), ApiError> {
    let rid = &req_id.0;
    if body.name.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "name must not be empty",
        ));
    }
    if body.rate_per_day <= 0.0 || !body.rate_per_day.is_finite() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "rate_per_day must be a positive number",
        ));
    }

    let provider = pawkeep_db::NewProvider {
        name: body.name.trim().to_owned(),
        bio: body.bio,
        rate: body.rate_per_day,
        rating: body.rating,
        categories: body.categories,
    };

    let row = pawkeep_db::create_sitter(&state.pool, &provider)
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

/// GET /api/v1/sitting-bookings?pet_id=
pub(super) async fn list_sitting_bookings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<SittingBookingsQuery>,
) -> Result<Json<ApiResponse<Vec<SittingBookingItem>>>, ApiError> {
    let rows = pawkeep_db::list_sitting_bookings(&state.pool, user.0, query.pet_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(SittingBookingItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/sitting-bookings
pub(super) async fn create_sitting_booking(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateSittingBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SittingBookingItem>>), ApiError> {
    let rid = &req_id.0;

    if body.dropoff_date < body.pickup_date {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "dropoff_date must be on or after pickup_date",
        ));
    }

    pawkeep_db::get_owned_pet(&state.pool, body.pet_id, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| not_found(rid.clone(), "pet"))?;

    let sitter = pawkeep_db::get_active_sitter(&state.pool, body.sitter_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| not_found(rid.clone(), "sitter"))?;

    let total_cost = estimate_daily(sitter.rate_per_day, body.pickup_date, body.dropoff_date);

    let row = pawkeep_db::create_sitting_booking(
        &state.pool,
        body.pet_id,
        sitter.id,
        body.pickup_date,
        body.dropoff_date,
        &body.pickup_address,
        &body.dropoff_address,
        total_cost,
        body.notes.as_deref(),
    )
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
