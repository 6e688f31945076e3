//! HTTP-level tests for `POST /functions/v1/create-task`.

mod common;

use assert_matches::assert_matches;
use axum::body::Body;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{body_json, call_create_task, in_one_hour, seed_application};
use leadflow_core::roles::Role;
use leadflow_events::TASK_CREATED;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

/// Field names reported in a validation body, in order.
fn detail_fields(json: &Value) -> Vec<String> {
    json["details"]
        .as_array()
        .expect("details array")
        .iter()
        .map(|d| d["field"].as_str().unwrap().to_string())
        .collect()
}

fn detail_message<'a>(json: &'a Value, field: &str) -> Option<&'a str> {
    json["details"]
        .as_array()?
        .iter()
        .find(|d| d["field"] == field)
        .and_then(|d| d["message"].as_str())
}

// ---------------------------------------------------------------------------
// Success
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn valid_request_creates_task_in_application_tenant(pool: PgPool) {
    let owner = common::user(Uuid::new_v4(), Role::Counselor);
    let application = seed_application(&pool, &owner).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "application_id": application.id,
        "task_type": "call",
        "due_at": in_one_hour(),
    });
    let response = call_create_task(app, Method::POST, body.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let task_id: Uuid = json["task_id"].as_str().unwrap().parse().unwrap();

    let (tenant_id, title, status): (Uuid, String, String) =
        sqlx::query_as("SELECT tenant_id, title, status FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(tenant_id, application.tenant_id);
    assert_eq!(title, "Call follow-up");
    assert_eq!(status, "open");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tenant_in_body_is_ignored(pool: PgPool) {
    let owner = common::user(Uuid::new_v4(), Role::Admin);
    let application = seed_application(&pool, &owner).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "application_id": application.id.to_string(),
        "task_type": "email",
        "due_at": in_one_hour(),
        "tenant_id": Uuid::new_v4(),
        "title": "  Send brochure  ",
    });
    let response = call_create_task(app, Method::POST, body.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let task_id: Uuid = json["task_id"].as_str().unwrap().parse().unwrap();

    let (tenant_id, title): (Uuid, String) =
        sqlx::query_as("SELECT tenant_id, title FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(tenant_id, application.tenant_id);
    assert_eq!(title, "Send brochure");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn success_publishes_task_created(pool: PgPool) {
    let owner = common::user(Uuid::new_v4(), Role::Counselor);
    let application = seed_application(&pool, &owner).await;

    let (app, state) = common::build_test_app_with_state(pool);
    let mut rx = state.event_bus.subscribe();

    let body = json!({
        "application_id": application.id,
        "task_type": "review",
        "due_at": in_one_hour(),
    });
    let response = call_create_task(app, Method::POST, body.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let event = rx.try_recv().expect("task.created should be published");
    assert_eq!(event.event_type, TASK_CREATED);
    assert_eq!(event.tenant_id, Some(application.tenant_id));
    assert_eq!(event.payload["task_id"], json["task_id"]);
    assert_eq!(event.payload["task_type"], "review");
    assert_eq!(event.payload["tenant_id"], application.tenant_id.to_string());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_task_type_is_rejected(pool: PgPool) {
    let owner = common::user(Uuid::new_v4(), Role::Counselor);
    let application = seed_application(&pool, &owner).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({
        "application_id": application.id,
        "task_type": "invalid",
        "due_at": in_one_hour(),
    });
    let response = call_create_task(app, Method::POST, body.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Validation failed");
    assert_eq!(detail_fields(&json), vec!["task_type"]);
    assert_eq!(
        detail_message(&json, "task_type"),
        Some("task_type must be one of: call, email, review")
    );

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn past_due_at_is_rejected(pool: PgPool) {
    let owner = common::user(Uuid::new_v4(), Role::Counselor);
    let application = seed_application(&pool, &owner).await;

    let app = common::build_test_app(pool);
    let body = json!({
        "application_id": application.id,
        "task_type": "call",
        "due_at": (Utc::now() - Duration::hours(1)).to_rfc3339(),
    });
    let response = call_create_task(app, Method::POST, body.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(detail_fields(&json), vec!["due_at"]);
    assert_eq!(detail_message(&json, "due_at"), Some("due_at must be in the future"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_application_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "application_id": Uuid::new_v4(),
        "task_type": "call",
        "due_at": in_one_hour(),
    });
    let response = call_create_task(app, Method::POST, body.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        detail_message(&json, "application_id"),
        Some("Application not found")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn all_field_errors_are_reported_together(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "application_id": "not-a-uuid",
        "task_type": "fax",
        "due_at": "tomorrow-ish",
    });
    let response = call_create_task(app, Method::POST, body.to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        detail_fields(&json),
        vec!["application_id", "task_type", "due_at"]
    );
    assert_eq!(
        detail_message(&json, "application_id"),
        Some("application_id must be a valid UUID")
    );
    assert_eq!(
        detail_message(&json, "due_at"),
        Some("due_at must be a valid ISO-8601 timestamp")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_fields_are_required(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = call_create_task(app, Method::POST, "{}").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        detail_message(&json, "application_id"),
        Some("application_id is required")
    );
    assert_eq!(detail_message(&json, "task_type"), Some("task_type is required"));
    assert_eq!(detail_message(&json, "due_at"), Some("due_at is required"));
}

#[tokio::test]
async fn malformed_json_is_a_body_error() {
    let app = common::build_test_app(common::lazy_pool());
    let response = call_create_task(app, Method::POST, "{not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(detail_fields(&json), vec!["body"]);
}

// ---------------------------------------------------------------------------
// Service key
// ---------------------------------------------------------------------------

fn keyed_config() -> leadflow_api::config::ServerConfig {
    leadflow_api::config::ServerConfig {
        service_api_key: Some("svc-key".to_string()),
        ..common::test_config()
    }
}

async fn call_with_headers(
    app: axum::Router,
    headers: &[(&str, &str)],
    body: Value,
) -> axum::http::Response<Body> {
    let mut request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/functions/v1/create-task")
        .header("content-type", "application/json");
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    common::send(app, request.body(Body::from(body.to_string())).unwrap()).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn configured_service_key_is_required(pool: PgPool) {
    let owner = common::user(Uuid::new_v4(), Role::Counselor);
    let application = seed_application(&pool, &owner).await;
    let body = json!({
        "application_id": application.id,
        "task_type": "email",
        "due_at": in_one_hour(),
    });

    let missing = call_with_headers(
        common::build_test_app_with_config(pool.clone(), keyed_config()),
        &[],
        body.clone(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(missing.headers()["access-control-allow-origin"], "*");

    let wrong = call_with_headers(
        common::build_test_app_with_config(pool.clone(), keyed_config()),
        &[("apikey", "nope")],
        body.clone(),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let by_apikey = call_with_headers(
        common::build_test_app_with_config(pool.clone(), keyed_config()),
        &[("apikey", "svc-key")],
        body.clone(),
    )
    .await;
    assert_eq!(by_apikey.status(), StatusCode::OK);

    let by_bearer = call_with_headers(
        common::build_test_app_with_config(pool.clone(), keyed_config()),
        &[("authorization", "Bearer svc-key")],
        body,
    )
    .await;
    assert_eq!(by_bearer.status(), StatusCode::OK);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn preflight_needs_no_service_key() {
    let app = common::build_test_app_with_config(common::lazy_pool(), keyed_config());
    let response = call_create_task(app, Method::OPTIONS, Body::empty()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Method handling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn preflight_returns_204_with_permissive_headers() {
    let app = common::build_test_app(common::lazy_pool());
    let response = call_create_task(app, Method::OPTIONS, Body::empty()).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(
        headers["access-control-allow-headers"],
        "authorization, x-client-info, apikey, content-type"
    );
    assert_eq!(headers["access-control-allow-methods"], "POST, OPTIONS");
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let app = common::build_test_app(common::lazy_pool());
        let response = call_create_task(app, method.clone(), Body::empty()).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        let allow = response.headers().get("allow").map(|v| v.to_str().unwrap());
        assert_matches!(allow, Some("POST, OPTIONS"));
        let json = body_json(response).await;
        assert_eq!(json["code"], "METHOD_NOT_ALLOWED");
    }
}
