//! Lookup-table handlers: species and breeds.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, not_found, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct SpeciesItem {
    pub id: i64,
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct BreedItem {
    pub id: i64,
    pub name: String,
    pub species_id: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct BreedsQuery {
    pub species_id: Option<i64>,
}

/// GET /api/v1/species
pub(super) async fn list_species(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<SpeciesItem>>>, ApiError> {
    let rows = pawkeep_db::list_species(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| SpeciesItem {
            id: row.id,
            name: row.name,
            icon: row.icon,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/breeds?species_id=
pub(super) async fn list_breeds(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<BreedsQuery>,
) -> Result<Json<ApiResponse<Vec<BreedItem>>>, ApiError> {
    let rows = pawkeep_db::list_breeds(&state.pool, query.species_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| BreedItem {
            id: row.id,
            name: row.name,
            species_id: row.species_id,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/breeds/by-species/{species_name}
pub(super) async fn list_breeds_by_species(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(species_name): Path<String>,
) -> Result<Json<ApiResponse<Vec<BreedItem>>>, ApiError> {
    let species = pawkeep_db::get_species_by_name(&state.pool, &species_name)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| not_found(req_id.0.clone(), "species"))?;

    let rows = pawkeep_db::list_breeds(&state.pool, Some(species.id))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| BreedItem {
            id: row.id,
            name: row.name,
            species_id: row.species_id,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
