mod accounts;
mod alerts;
mod catalog;
mod community;
mod pets;
mod reminders;
mod sitters;
mod vaccinations;
mod vets;
mod walkers;
mod weight_logs;

use std::path::Path;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use crate::middleware::{request_id, require_auth, AuthState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthState,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "unprocessable" => StatusCode::UNPROCESSABLE_ENTITY,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &pawkeep_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn not_found(request_id: impl Into<String>, what: &str) -> ApiError {
    ApiError::new(request_id, "not_found", format!("{what} not found"))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn public_router(auth: AuthState) -> Router<AppState> {
    use axum::handler::Handler;

    Router::new()
        .route("/signup", post(accounts::signup))
        .route("/login", post(accounts::login))
        .route("/api/v1/health", get(health))
        .route("/api/v1/species", get(catalog::list_species))
        .route("/api/v1/breeds", get(catalog::list_breeds))
        .route(
            "/api/v1/breeds/by-species/{species_name}",
            get(catalog::list_breeds_by_species),
        )
        // Listing is public; creation shares the path but requires auth, so
        // the middleware wraps just that handler.
        .route(
            "/api/v1/vets",
            get(vets::list_vets).post(
                vets::create_vet.layer(axum::middleware::from_fn_with_state(auth, require_auth)),
            ),
        )
        .route("/api/v1/vets/search", get(vets::search_vets))
        .route("/api/v1/vets/{vet_id}", get(vets::get_vet))
        .route("/api/v1/stats/user-count", get(accounts::user_count))
}

fn protected_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/me", get(accounts::me).put(accounts::update_me))
        .route("/api/v1/pets", get(pets::list_pets).post(pets::create_pet))
        .route(
            "/api/v1/pets/{pet_id}",
            get(pets::get_pet)
                .put(pets::update_pet)
                .delete(pets::delete_pet),
        )
        .route(
            "/api/v1/checkup-reminders",
            get(reminders::list_reminders).post(reminders::create_reminder),
        )
        .route(
            "/api/v1/checkup-reminders/{reminder_id}",
            get(reminders::get_reminder)
                .put(reminders::update_reminder)
                .delete(reminders::delete_reminder),
        )
        .route(
            "/api/v1/vaccinations",
            get(vaccinations::list_vaccinations),
        )
        .route(
            "/api/v1/vaccinations/record",
            post(vaccinations::record_vaccination),
        )
        .route(
            "/api/v1/vaccinations/schedule",
            post(vaccinations::schedule_vaccination),
        )
        .route(
            "/api/v1/vaccinations/{vaccination_id}",
            get(vaccinations::get_vaccination)
                .put(vaccinations::update_vaccination)
                .delete(vaccinations::delete_vaccination),
        )
        .route(
            "/api/v1/weight-logs",
            get(weight_logs::list_weight_logs).post(weight_logs::create_weight_log),
        )
        .route(
            "/api/v1/walkers",
            get(walkers::list_walkers).post(walkers::create_walker),
        )
        .route(
            "/api/v1/walk-bookings",
            get(walkers::list_walk_bookings).post(walkers::create_walk_booking),
        )
        .route(
            "/api/v1/sitters",
            get(sitters::list_sitters).post(sitters::create_sitter),
        )
        .route(
            "/api/v1/sitting-bookings",
            get(sitters::list_sitting_bookings).post(sitters::create_sitting_booking),
        )
        .route("/api/v1/upcoming-alerts", get(alerts::upcoming_alerts))
        .route(
            "/api/v1/community/posts",
            get(community::list_posts).post(community::create_post),
        )
        .route(
            "/api/v1/community/posts/{post_id}",
            delete(community::delete_post),
        )
        .route(
            "/api/v1/community/posts/{post_id}/comments",
            get(community::list_comments).post(community::create_comment),
        )
        .route(
            "/api/v1/community/posts/{post_id}/like",
            post(community::toggle_like),
        )
        .route("/api/v1/feedback", post(community::create_feedback))
        .layer(axum::middleware::from_fn_with_state(auth, require_auth))
}

pub fn build_app(state: AppState, auth: AuthState, static_dir: &Path) -> Router {
    let assets = ServeDir::new(static_dir)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .merge(public_router(auth.clone()))
        .merge(protected_router(auth))
        .fallback_service(assets)
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match pawkeep_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::middleware::AuthState;
    use crate::auth::TokenSigner;

    fn test_auth() -> AuthState {
        AuthState {
            signer: TokenSigner::new("test-secret"),
            password_salt: "test-salt".to_string(),
            token_ttl_secs: 3600,
        }
    }

    fn test_app(pool: sqlx::PgPool) -> Router {
        let auth = test_auth();
        build_app(
            AppState {
                pool,
                auth: auth.clone(),
            },
            auth,
            Path::new("./static"),
        )
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn authed_json_request(
        method: &str,
        uri: &str,
        token: &str,
        body: serde_json::Value,
    ) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn authed_get(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request")
    }

    /// Signs up a fresh user through the API and returns their token.
    async fn signup_user(app: &Router, email: &str) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/signup",
                serde_json::json!({
                    "name": "Test User",
                    "email": email,
                    "password": "hunter2",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        json["data"]["access_token"]
            .as_str()
            .expect("access_token")
            .to_string()
    }

    async fn create_test_pet(app: &Router, token: &str) -> i64 {
        let response = app
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/pets",
                token,
                serde_json::json!({
                    "name": "Bruno",
                    "species": "Dog",
                    "breed": "Labrador Retriever",
                    "age_years": 3,
                    "age_months": 2,
                    "weight_kg": 24.5,
                    "gender": "male",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        json["data"]["id"].as_i64().expect("pet id")
    }

    #[test]
    fn api_error_codes_map_to_expected_statuses() {
        let cases = [
            ("not_found", StatusCode::NOT_FOUND),
            ("unauthorized", StatusCode::UNAUTHORIZED),
            ("validation_error", StatusCode::BAD_REQUEST),
            ("unprocessable", StatusCode::UNPROCESSABLE_ENTITY),
            ("conflict", StatusCode::CONFLICT),
            ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (code, status) in cases {
            let response = ApiError::new("req-1", code, "msg").into_response();
            assert_eq!(response.status(), status, "code {code}");
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_returns_ok(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn protected_route_rejects_missing_token(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/pets")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn signup_then_login_issues_working_token(pool: sqlx::PgPool) {
        let app = test_app(pool);
        signup_user(&app, "login-flow@example.com").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/login",
                serde_json::json!({
                    "email": "login-flow@example.com",
                    "password": "hunter2",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["token_type"].as_str(), Some("bearer"));
        let token = json["data"]["access_token"].as_str().expect("token");

        let response = app
            .oneshot(authed_get("/api/v1/me", token))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(
            json["data"]["email"].as_str(),
            Some("login-flow@example.com")
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn login_rejects_bad_password(pool: sqlx::PgPool) {
        let app = test_app(pool);
        signup_user(&app, "bad-pass@example.com").await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/login",
                serde_json::json!({
                    "email": "bad-pass@example.com",
                    "password": "wrong",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn signup_duplicate_email_returns_conflict(pool: sqlx::PgPool) {
        let app = test_app(pool);
        signup_user(&app, "dup@example.com").await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/signup",
                serde_json::json!({
                    "name": "Other User",
                    "email": "dup@example.com",
                    "password": "hunter2",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn pets_crud_round_trip(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let token = signup_user(&app, "pets-crud@example.com").await;
        let pet_id = create_test_pet(&app, &token).await;

        // read back
        let response = app
            .clone()
            .oneshot(authed_get(&format!("/api/v1/pets/{pet_id}"), &token))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["name"].as_str(), Some("Bruno"));

        // sparse update
        let response = app
            .clone()
            .oneshot(authed_json_request(
                "PUT",
                &format!("/api/v1/pets/{pet_id}"),
                &token,
                serde_json::json!({"name": "Brownie"}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["name"].as_str(), Some("Brownie"));
        assert_eq!(json["data"]["species"].as_str(), Some("Dog"));

        // soft delete hides the pet
        let response = app
            .clone()
            .oneshot(authed_json_request(
                "DELETE",
                &format!("/api/v1/pets/{pet_id}"),
                &token,
                serde_json::json!({}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(authed_get(&format!("/api/v1/pets/{pet_id}"), &token))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn foreign_pet_is_invisible(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let owner = signup_user(&app, "owner@example.com").await;
        let stranger = signup_user(&app, "stranger@example.com").await;
        let pet_id = create_test_pet(&app, &owner).await;

        let response = app
            .oneshot(authed_get(&format!("/api/v1/pets/{pet_id}"), &stranger))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn walk_booking_freezes_estimated_cost(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let token = signup_user(&app, "walk-booking@example.com").await;
        let pet_id = create_test_pet(&app, &token).await;

        let response = app
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/walkers",
                &token,
                serde_json::json!({"name": "Test Walker", "rate_per_hour": 300.0}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let walker_id = json_body(response).await["data"]["id"]
            .as_i64()
            .expect("walker id");

        let response = app
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/walk-bookings",
                &token,
                serde_json::json!({
                    "pet_id": pet_id,
                    "walker_id": walker_id,
                    "scheduled_date": "2026-09-01T09:00:00Z",
                    "scheduled_time": "09:00",
                    "duration_minutes": 90,
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        // 300/hr for 90 min
        assert!((json["data"]["total_cost"].as_f64().expect("cost") - 450.0).abs() < 1e-9);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn walk_booking_rejects_nonpositive_duration(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let token = signup_user(&app, "walk-duration@example.com").await;
        let pet_id = create_test_pet(&app, &token).await;

        let response = app
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/walkers",
                &token,
                serde_json::json!({"name": "Duration Walker", "rate_per_hour": 300.0}),
            ))
            .await
            .expect("response");
        let walker_id = json_body(response).await["data"]["id"]
            .as_i64()
            .expect("walker id");

        for duration in [0, -30] {
            let response = app
                .clone()
                .oneshot(authed_json_request(
                    "POST",
                    "/api/v1/walk-bookings",
                    &token,
                    serde_json::json!({
                        "pet_id": pet_id,
                        "walker_id": walker_id,
                        "scheduled_date": "2026-09-01T09:00:00Z",
                        "scheduled_time": "09:00",
                        "duration_minutes": duration,
                    }),
                ))
                .await
                .expect("response");
            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "duration {duration} should be rejected"
            );
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn sitting_booking_rejects_inverted_dates(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let token = signup_user(&app, "sitting-dates@example.com").await;
        let pet_id = create_test_pet(&app, &token).await;

        let response = app
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/sitters",
                &token,
                serde_json::json!({"name": "Test Sitter", "rate_per_day": 800.0}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let sitter_id = json_body(response).await["data"]["id"]
            .as_i64()
            .expect("sitter id");

        let response = app
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/sitting-bookings",
                &token,
                serde_json::json!({
                    "pet_id": pet_id,
                    "sitter_id": sitter_id,
                    "pickup_date": "2026-09-05",
                    "dropoff_date": "2026-09-01",
                    "pickup_address": "A",
                    "dropoff_address": "B",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn sitting_booking_same_day_bills_one_day(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let token = signup_user(&app, "sitting-same-day@example.com").await;
        let pet_id = create_test_pet(&app, &token).await;

        let response = app
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/sitters",
                &token,
                serde_json::json!({"name": "Same Day Sitter", "rate_per_day": 800.0}),
            ))
            .await
            .expect("response");
        let sitter_id = json_body(response).await["data"]["id"]
            .as_i64()
            .expect("sitter id");

        let response = app
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/sitting-bookings",
                &token,
                serde_json::json!({
                    "pet_id": pet_id,
                    "sitter_id": sitter_id,
                    "pickup_date": "2026-09-01",
                    "dropoff_date": "2026-09-01",
                    "pickup_address": "A",
                    "dropoff_address": "B",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert!((json["data"]["total_cost"].as_f64().expect("cost") - 800.0).abs() < 1e-9);
    }

    async fn seed_test_vet(pool: &sqlx::PgPool, name: &str, lat: f64, lon: f64) {
        sqlx::query(
            "INSERT INTO vets (name, address, latitude, longitude, specialties) \
             VALUES ($1, 'Test Address', $2, $3, '[]'::jsonb)",
        )
        .bind(name)
        .bind(lat)
        .bind(lon)
        .execute(pool)
        .await
        .expect("insert vet");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn vet_search_ranks_by_distance_and_formats_it(pool: sqlx::PgPool) {
        seed_test_vet(&pool, "Old Delhi Clinic", 28.6562, 77.2410).await;
        seed_test_vet(&pool, "Saket Clinic", 28.5245, 77.2065).await;

        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/vets/search?latitude=28.6139&longitude=77.2090&radius_km=25")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"].as_str(), Some("Old Delhi Clinic"));
        assert_eq!(data[0]["distance_text"].as_str(), Some("5.6 km"));
        assert!(
            data[0]["distance_km"].as_f64().expect("distance")
                < data[1]["distance_km"].as_f64().expect("distance")
        );
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn vet_search_rejects_out_of_range_coordinates(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/vets/search?latitude=91.0&longitude=77.2090")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn vet_search_empty_result_is_ok(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/vets/search?latitude=28.6139&longitude=77.2090&radius_km=5")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn weight_log_updates_pet_current_weight(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let token = signup_user(&app, "weight@example.com").await;
        let pet_id = create_test_pet(&app, &token).await;

        let response = app
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/weight-logs",
                &token,
                serde_json::json!({
                    "pet_id": pet_id,
                    "weight_kg": 26.0,
                    "recorded_at": "2026-08-01T10:00:00Z",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(authed_get(&format!("/api/v1/pets/{pet_id}"), &token))
            .await
            .expect("response");
        let json = json_body(response).await;
        assert!((json["data"]["weight_kg"].as_f64().expect("weight") - 26.0).abs() < 1e-9);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn community_like_toggles(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let token = signup_user(&app, "likes@example.com").await;

        let response = app
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/community/posts",
                &token,
                serde_json::json!({"title": "Hello", "content": "First post"}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let post_id = json_body(response).await["data"]["id"]
            .as_i64()
            .expect("post id");

        let like_uri = format!("/api/v1/community/posts/{post_id}/like");
        let response = app
            .clone()
            .oneshot(authed_json_request("POST", &like_uri, &token, serde_json::json!({})))
            .await
            .expect("response");
        let json = json_body(response).await;
        assert_eq!(json["data"]["liked"].as_bool(), Some(true));
        assert_eq!(json["data"]["like_count"].as_i64(), Some(1));

        let response = app
            .oneshot(authed_json_request("POST", &like_uri, &token, serde_json::json!({})))
            .await
            .expect("response");
        let json = json_body(response).await;
        assert_eq!(json["data"]["liked"].as_bool(), Some(false));
        assert_eq!(json["data"]["like_count"].as_i64(), Some(0));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn upcoming_alerts_merges_reminders_and_vaccinations(pool: sqlx::PgPool) {
        let app = test_app(pool);
        let token = signup_user(&app, "alerts@example.com").await;
        let pet_id = create_test_pet(&app, &token).await;

        let soon = (Utc::now() + chrono::Duration::days(3)).to_rfc3339();
        let response = app
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/checkup-reminders",
                &token,
                serde_json::json!({
                    "pet_id": pet_id,
                    "title": "Annual checkup",
                    "checkup_type": "general",
                    "due_date": soon,
                    "due_time": "10:00",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(authed_json_request(
                "POST",
                "/api/v1/vaccinations/schedule",
                &token,
                serde_json::json!({
                    "pet_id": pet_id,
                    "vaccine_name": "Rabies",
                    "vaccine_type": "core",
                    "scheduled_date": soon,
                    "scheduled_time": "11:00",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(authed_get("/api/v1/upcoming-alerts?days=7", &token))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 2);
        assert!(data.iter().all(|a| a["status"].as_str() == Some("upcoming")));
        let kinds: Vec<_> = data
            .iter()
            .filter_map(|a| a["kind"].as_str())
            .collect();
        assert!(kinds.contains(&"checkup"));
        assert!(kinds.contains(&"vaccination"));
    }
}
