//! Account handlers: signup, login, profile, and the public user counter.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, verify_password};
use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, not_found, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<pawkeep_db::UserRow> for UserProfile {
    fn from(row: pawkeep_db::UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UserCountData {
    pub user_count: i64,
}

fn validate_signup(req_id: &str, body: &SignupRequest) -> Result<(), ApiError> {
    let name = body.name.trim();
    if name.is_empty() || name.len() > 200 {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "name must be 1–200 characters",
        ));
    }
    if !body.email.contains('@') {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "email must be a valid address",
        ));
    }
    if body.password.len() < 6 {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "password must be at least 6 characters",
        ));
    }
    Ok(())
}

fn map_unique_violation(req_id: &str, e: &pawkeep_db::DbError) -> ApiError {
    if let pawkeep_db::DbError::Sqlx(sqlx::Error::Database(db_err)) = e {
        if db_err.code().as_deref() == Some("23505") {
            return ApiError::new(req_id, "conflict", "an account with that email already exists");
        }
    }
    map_db_error(req_id.to_owned(), e)
}

/// POST /signup — create an account and issue a token immediately.
pub(super) async fn signup(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TokenResponse>>), ApiError> {
    let rid = &req_id.0;
    validate_signup(rid, &body)?;

    let email = body.email.trim().to_lowercase();
    let password_hash = hash_password(&state.auth.password_salt, &body.password);

    let user = pawkeep_db::create_user(
        &state.pool,
        body.name.trim(),
        &email,
        body.phone.as_deref(),
        &password_hash,
    )
    .await
    .map_err(|e| map_unique_violation(rid, &e))?;

    let access_token = state.auth.signer.mint(user.id, state.auth.token_ttl_secs);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: TokenResponse {
                access_token,
                token_type: "bearer",
                expires_in: state.auth.token_ttl_secs,
                user_id: user.id,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// POST /login — verify credentials and issue a token.
///
/// The same 401 is returned for unknown emails and wrong passwords.
pub(super) async fn login(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let rid = &req_id.0;
    let email = body.email.trim().to_lowercase();

    let user = pawkeep_db::get_user_by_email(&state.pool, &email)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let authenticated = user.filter(|u| {
        verify_password(&state.auth.password_salt, &body.password, &u.password_hash)
    });

    match authenticated {
        Some(user) => {
            let access_token = state.auth.signer.mint(user.id, state.auth.token_ttl_secs);
            Ok(Json(ApiResponse {
                data: TokenResponse {
                    access_token,
                    token_type: "bearer",
                    expires_in: state.auth.token_ttl_secs,
                    user_id: user.id,
                },
                meta: ResponseMeta::new(req_id.0),
            }))
        }
        None => Err(ApiError::new(
            rid,
            "unauthorized",
            "invalid email or password",
        )),
    }
}

/// GET /api/v1/me — current user's profile.
pub(super) async fn me(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let row = pawkeep_db::get_user_by_id(&state.pool, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| not_found(req_id.0.clone(), "user"))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/me — update name and/or phone.
pub(super) async fn update_me(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    if let Some(ref name) = body.name {
        if name.trim().is_empty() {
            return Err(ApiError::new(
                &req_id.0,
                "validation_error",
                "name must not be empty",
            ));
        }
    }

    let row = pawkeep_db::update_user_profile(
        &state.pool,
        user.0,
        body.name.as_deref().map(str::trim),
        body.phone.as_deref(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/stats/user-count — public registration counter.
pub(super) async fn user_count(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<UserCountData>>, ApiError> {
    let count = pawkeep_db::count_users(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: UserCountData { user_count: count },
        meta: ResponseMeta::new(req_id.0),
    }))
}
