//! Weight log handlers. Creating a log also updates the pet's current weight
//! inside the same transaction (see `pawkeep_db::create_weight_log`).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, not_found, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CreateWeightLogRequest {
    pub pet_id: i64,
    pub weight_kg: f64,
    pub recorded_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub body_condition_score: Option<i32>,
    pub activity_level: Option<String>,
    pub feeding_amount: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WeightLogsQuery {
    pub pet_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct WeightLogItem {
    pub id: i64,
    pub pet_id: i64,
    pub weight_kg: f64,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub body_condition_score: Option<i32>,
    pub activity_level: Option<String>,
    pub feeding_amount: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<pawkeep_db::WeightLogRow> for WeightLogItem {
    fn from(row: pawkeep_db::WeightLogRow) -> Self {
        Self {
            id: row.id,
            pet_id: row.pet_id,
            weight_kg: row.weight_kg,
            recorded_at: row.recorded_at,
            notes: row.notes,
            body_condition_score: row.body_condition_score,
            activity_level: row.activity_level,
            feeding_amount: row.feeding_amount,
            created_at: row.created_at,
        }
    }
}

/// GET /api/v1/weight-logs?pet_id= — ascending by record date.
pub(super) async fn list_weight_logs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<WeightLogsQuery>,
) -> Result<Json<ApiResponse<Vec<WeightLogItem>>>, ApiError> {
    let rows = pawkeep_db::list_weight_logs(&state.pool, user.0, query.pet_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(WeightLogItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/weight-logs
pub(super) async fn create_weight_log(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateWeightLogRequest>,
) -> Result<(StatusCode, Json<ApiResponse<WeightLogItem>>), ApiError> {
    let rid = &req_id.0;
    if body.weight_kg <= 0.0 || !body.weight_kg.is_finite() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "weight_kg must be a positive number",
        ));
    }

    pawkeep_db::get_owned_pet(&state.pool, body.pet_id, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| not_found(rid.clone(), "pet"))?;

    let new_log = pawkeep_db::NewWeightLog {
        pet_id: body.pet_id,
        weight_kg: body.weight_kg,
        recorded_at: body.recorded_at.unwrap_or_else(Utc::now),
        notes: body.notes,
        body_condition_score: body.body_condition_score,
        activity_level: body.activity_level,
        feeding_amount: body.feeding_amount,
    };

    let row = pawkeep_db::create_weight_log(&state.pool, &new_log)
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
