//! Database operations for the social feed: posts, comments, likes, feedback.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A bare row from the `community_posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A post joined with its author name, comment/like counts, and whether the
/// viewing user has liked it. `viewer_user_id` may be absent (anonymous feed).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostSummaryRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub comment_count: i64,
    pub like_count: i64,
    pub is_liked_by_user: bool,
}

/// A comment joined with its author name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
}

/// A row from the `feedback` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedbackRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    Unliked,
}

/// Returns the whole feed, newest first, with counts aggregated in SQL
/// rather than per-post follow-up queries.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts(
    pool: &PgPool,
    viewer_user_id: Option<i64>,
) -> Result<Vec<PostSummaryRow>, DbError> {
    let rows = sqlx::query_as::<_, PostSummaryRow>(
        "SELECT cp.id, cp.user_id, cp.title, cp.content, cp.image_url, cp.created_at, \
                u.name AS user_name, \
                (SELECT COUNT(*) FROM post_comments c WHERE c.post_id = cp.id) AS comment_count, \
                (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = cp.id) AS like_count, \
                EXISTS (\
                    SELECT 1 FROM post_likes l \
                    WHERE l.post_id = cp.id AND l.user_id = $1\
                ) AS is_liked_by_user \
         FROM community_posts cp \
         JOIN users u ON u.id = cp.user_id \
         ORDER BY cp.created_at DESC",
    )
    .bind(viewer_user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Returns one bare post by id, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_post(pool: &PgPool, post_id: i64) -> Result<Option<PostRow>, DbError> {
    let row = sqlx::query_as::<_, PostRow>(
        "SELECT id, user_id, title, content, image_url, created_at \
         FROM community_posts WHERE id = $1",
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Inserts a post and returns the bare row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_post(
    pool: &PgPool,
    user_id: i64,
    title: &str,
    content: &str,
    image_url: Option<&str>,
) -> Result<PostRow, DbError> {
    let row = sqlx::query_as::<_, PostRow>(
        "INSERT INTO community_posts (user_id, title, content, image_url) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, user_id, title, content, image_url, created_at",
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .bind(image_url)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Deletes a post only if `user_id` is its author; comments and likes go with
/// it via cascade. Returns `true` if a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_post_owned(pool: &PgPool, post_id: i64, user_id: i64) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM community_posts WHERE id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Returns comments for a post, oldest first, with author names.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_comments(pool: &PgPool, post_id: i64) -> Result<Vec<CommentRow>, DbError> {
    let rows = sqlx::query_as::<_, CommentRow>(
        "SELECT c.id, c.post_id, c.user_id, c.content, c.created_at, u.name AS user_name \
         FROM post_comments c \
         JOIN users u ON u.id = c.user_id \
         WHERE c.post_id = $1 \
         ORDER BY c.created_at",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Inserts a comment and returns it with the author name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_comment(
    pool: &PgPool,
    post_id: i64,
    user_id: i64,
    content: &str,
) -> Result<CommentRow, DbError> {
    let row = sqlx::query_as::<_, CommentRow>(
        "WITH inserted AS (\
            INSERT INTO post_comments (post_id, user_id, content) \
            VALUES ($1, $2, $3) \
            RETURNING id, post_id, user_id, content, created_at\
         ) \
         SELECT i.id, i.post_id, i.user_id, i.content, i.created_at, u.name AS user_name \
         FROM inserted i JOIN users u ON u.id = i.user_id",
    )
    .bind(post_id)
    .bind(user_id)
    .bind(content)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Likes the post if the user has not liked it, removes the like otherwise.
/// Both paths run in one transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails.
pub async fn toggle_like(
    pool: &PgPool,
    post_id: i64,
    user_id: i64,
) -> Result<LikeOutcome, DbError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let outcome = if removed.rows_affected() > 0 {
        LikeOutcome::Unliked
    } else {
        sqlx::query("INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        LikeOutcome::Liked
    };

    tx.commit().await?;
    Ok(outcome)
}

/// Current number of likes on a post.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn like_count(pool: &PgPool, post_id: i64) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Inserts a feedback entry and returns the row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_feedback(
    pool: &PgPool,
    user_id: i64,
    title: &str,
    content: &str,
    rating: i32,
) -> Result<FeedbackRow, DbError> {
    let row = sqlx::query_as::<_, FeedbackRow>(
        "INSERT INTO feedback (user_id, title, content, rating) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, user_id, title, content, rating, created_at",
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .bind(rating)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
