//! Social feed handlers: posts, comments, like toggling, feedback.

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
pub(super) struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreateFeedbackRequest {
    pub title: String,
    pub content: String,
    pub rating: i32,
}

#[derive(Debug, Serialize)]
pub(super) struct PostItem {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub comment_count: i64,
    pub like_count: i64,
    pub is_liked_by_user: bool,
    pub created_at: DateTime<Utc>,
}

impl From<pawkeep_db::PostSummaryRow> for PostItem {
    fn from(row: pawkeep_db::PostSummaryRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            title: row.title,
            content: row.content,
            image_url: row.image_url,
            comment_count: row.comment_count,
            like_count: row.like_count,
            is_liked_by_user: row.is_liked_by_user,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreatedPost {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct CommentItem {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<pawkeep_db::CommentRow> for CommentItem {
    fn from(row: pawkeep_db::CommentRow) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            user_id: row.user_id,
            user_name: row.user_name,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct LikeData {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct FeedbackData {
    pub id: i64,
    pub title: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedData {
    pub deleted: bool,
}

/// GET /api/v1/community/posts — the whole feed, newest first.
pub(super) async fn list_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<PostItem>>>, ApiError> {
    let rows = pawkeep_db::list_posts(&state.pool, Some(user.0))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(PostItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/community/posts
pub(super) async fn create_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedPost>>), ApiError> {
    let rid = &req_id.0;
    if body.title.trim().is_empty() || body.content.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "title and content must not be empty",
        ));
    }

    let row = pawkeep_db::create_post(
        &state.pool,
        user.0,
        body.title.trim(),
        &body.content,
        body.image_url.as_deref(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CreatedPost {
                id: row.id,
                title: row.title,
                content: row.content,
                image_url: row.image_url,
                created_at: row.created_at,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// DELETE /api/v1/community/posts/{post_id} — author only.
pub(super) async fn delete_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let deleted = pawkeep_db::delete_post_owned(&state.pool, post_id, user.0)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(not_found(req_id.0.clone(), "post"));
    }

    Ok(Json(ApiResponse {
        data: DeletedData { deleted: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/community/posts/{post_id}/comments
pub(super) async fn list_comments(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<CommentItem>>>, ApiError> {
    let rid = &req_id.0;
    pawkeep_db::get_post(&state.pool, post_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| not_found(rid.clone(), "post"))?;

    let rows = pawkeep_db::list_comments(&state.pool, post_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(CommentItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/community/posts/{post_id}/comments
pub(super) async fn create_comment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(post_id): Path<i64>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentItem>>), ApiError> {
    let rid = &req_id.0;
    if body.content.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "content must not be empty",
        ));
    }

    pawkeep_db::get_post(&state.pool, post_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| not_found(rid.clone(), "post"))?;

    let row = pawkeep_db::create_comment(&state.pool, post_id, user.0, &body.content)
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

/// POST /api/v1/community/posts/{post_id}/like — toggle.
pub(super) async fn toggle_like(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<LikeData>>, ApiError> {
    let rid = &req_id.0;
    pawkeep_db::get_post(&state.pool, post_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| not_found(rid.clone(), "post"))?;

    let outcome = pawkeep_db::toggle_like(&state.pool, post_id, user.0)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let like_count = pawkeep_db::like_count(&state.pool, post_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: LikeData {
            liked: outcome == pawkeep_db::LikeOutcome::Liked,
            like_count,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/feedback
pub(super) async fn create_feedback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FeedbackData>>), ApiError> {
    let rid = &req_id.0;
    if !(1..=5).contains(&body.rating) {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "rating must be between 1 and 5",
        ));
    }
    if body.title.trim().is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "title must not be empty",
        ));
    }

    let row = pawkeep_db::create_feedback(
        &state.pool,
        user.0,
        body.title.trim(),
        &body.content,
        body.rating,
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: FeedbackData {
                id: row.id,
                title: row.title,
                rating: row.rating,
                created_at: row.created_at,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
