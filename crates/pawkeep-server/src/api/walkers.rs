//! Walker roster and walk booking handlers.
//!
//! Booking creation validates pet ownership and walker existence before any
//! cost computation, then freezes the quoted `total_cost` on the row.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pawkeep_core::estimate_hourly;

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, not_found, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CreateWalkerRequest {
    pub name: String,
    pub bio: Option<String>,
    pub rate_per_hour: f64,
    pub rating: Option<f64>,
    pub categories: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateWalkBookingRequest {
    pub pet_id: i64,
    pub walker_id: i64,
    pub scheduled_date: DateTime<Utc>,
    pub scheduled_time: String,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WalkBookingsQuery {
    pub pet_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct WalkerItem {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub rate_per_hour: f64,
    pub rating: Option<f64>,
    pub categories: Option<String>,
}

impl From<pawkeep_db::WalkerRow> for WalkerItem {
    fn from(row: pawkeep_db::WalkerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            bio: row.bio,
            rate_per_hour: row.rate_per_hour,
            rating: row.rating,
            categories: row.categories,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct WalkBookingItem {
    pub id: i64,
    pub pet_id: i64,
    pub walker_id: i64,
    pub scheduled_date: DateTime<Utc>,
    pub scheduled_time: String,
    pub duration_minutes: i32,
    pub total_cost: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<pawkeep_db::WalkBookingRow> for WalkBookingItem {
    fn from(row: pawkeep_db::WalkBookingRow) -> Self {
        Self {
            id: row.id,
            pet_id: row.pet_id,
            walker_id: row.walker_id,
            scheduled_date: row.scheduled_date,
            scheduled_time: row.scheduled_time,
            duration_minutes: row.duration_minutes,
            total_cost: row.total_cost,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

/// GET /api/v1/walkers
pub(super) async fn list_walkers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<WalkerItem>>>, ApiError> {
    let rows = pawkeep_db::list_active_walkers(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(WalkerItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/walkers
pub(super) async fn create_walker(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateWalkerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WalkerItem>>), ApiError> {
    let rid = &req_id.0;
    if body.name.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "name must not be empty",
        ));
    }
    if body.rate_per_hour <= 0.0 || !body.rate_per_hour.is_finite() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "rate_per_hour must be a positive number",
        ));
    }

    let provider = pawkeep_db::NewProvider {
        name: body.name.trim().to_owned(),
        bio: body.bio,
        rate: body.rate_per_hour,
        rating: body.rating,
        categories: body.categories,
    };

    let row = pawkeep_db::create_walker(&state.pool, &provider)
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

/// GET /api/v1/walk-bookings?pet_id=
pub(super) async fn list_walk_bookings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<WalkBookingsQuery>,
) -> Result<Json<ApiResponse<Vec<WalkBookingItem>>>, ApiError> {
    let rows = pawkeep_db::list_walk_bookings(&state.pool, user.0, query.pet_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(WalkBookingItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/walk-bookings
pub(super) async fn create_walk_booking(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateWalkBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WalkBookingItem>>), ApiError> {
    let rid = &req_id.0;

    if body.duration_minutes <= 0 {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "duration_minutes must be positive",
        ));
    }

    pawkeep_db::get_owned_pet(&state.pool, body.pet_id, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| not_found(rid.clone(), "pet"))?;

    let walker = pawkeep_db::get_active_walker(&state.pool, body.walker_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| not_found(rid.clone(), "walker"))?;

    let total_cost = estimate_hourly(walker.rate_per_hour, body.duration_minutes);

    let row = pawkeep_db::create_walk_booking(
        &state.pool,
        body.pet_id,
        walker.id,
        body.scheduled_date,
        &body.scheduled_time,
        body.duration_minutes,
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
