#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use leadflow_api::auth::jwt::{encode_claims, generate_access_token, Claims, JwtConfig};
use leadflow_api::config::ServerConfig;
use leadflow_api::router::build_app_router;
use leadflow_api::state::AppState;
use leadflow_api::ws::WsManager;
use leadflow_core::access::ServiceRole;
use leadflow_core::roles::Role;
use leadflow_core::types::{DbId, Timestamp};
use leadflow_db::models::application::{Application, CreateApplication};
use leadflow_db::models::lead::{CreateLead, Lead};
use leadflow_db::repositories::{ApplicationRepo, LeadRepo};
use leadflow_events::EventBus;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "leadflow-test-secret-that-is-long-enough";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        service_api_key: None,
    }
}

pub fn test_state(pool: PgPool) -> AppState {
    state_with_config(pool, test_config())
}

pub fn state_with_config(pool: PgPool, config: ServerConfig) -> AppState {
    AppState {
        pool,
        config: Arc::new(config),
        event_bus: Arc::new(EventBus::default()),
        ws_manager: Arc::new(WsManager::new()),
        service: Arc::new(ServiceRole::internal("create-task")),
    }
}

/// Build the full application router through the same builder `main.rs`
/// uses, so tests exercise the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(test_state(pool), &test_config())
}

/// Like [`build_test_app`], but also hands back the state so a test can
/// subscribe to the event bus or inspect realtime connections.
pub fn build_test_app_with_state(pool: PgPool) -> (Router, AppState) {
    let state = test_state(pool);
    (build_app_router(state.clone(), &test_config()), state)
}

/// Build the router with a caller-supplied configuration.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    build_app_router(state_with_config(pool, config.clone()), &config)
}

/// A pool that never connects. For routes that are rejected before any
/// query runs.
pub fn lazy_pool() -> PgPool {
    sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://leadflow@localhost/leadflow_unused")
        .unwrap()
}

// ---------------------------------------------------------------------------
// Identities
// ---------------------------------------------------------------------------

/// A resolved identity plus the bearer token that carries it.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub user_id: DbId,
    pub tenant_id: DbId,
    pub role: Role,
    pub token: String,
}

pub fn user(tenant_id: DbId, role: Role) -> TestUser {
    let user_id = Uuid::new_v4();
    let token =
        generate_access_token(user_id, tenant_id, role.as_str(), &test_config().jwt).unwrap();
    TestUser {
        user_id,
        tenant_id,
        role,
        token,
    }
}

pub fn admin(tenant_id: DbId) -> TestUser {
    user(tenant_id, Role::Admin)
}

pub fn counselor(tenant_id: DbId) -> TestUser {
    user(tenant_id, Role::Counselor)
}

/// A correctly signed token whose tenant claim is missing.
pub fn token_without_tenant(role: &str) -> String {
    let now = Utc::now().timestamp();
    encode_claims(
        &Claims {
            sub: Some(Uuid::new_v4().to_string()),
            tenant_id: None,
            role: Some(role.to_string()),
            exp: now + 600,
            iat: now,
        },
        &test_config().jwt,
    )
    .unwrap()
}

/// Sign an arbitrary JSON payload with the test secret.
pub fn signed_token(payload: serde_json::Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &payload,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub async fn seed_lead(pool: &PgPool, owner: &TestUser, team_id: Option<DbId>) -> Lead {
    LeadRepo::create(
        pool,
        &CreateLead {
            tenant_id: owner.tenant_id,
            owner_id: owner.user_id,
            team_id,
            first_name: "Ada".to_string(),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.test".to_string()),
            phone: None,
            stage: None,
            source: Some("web".to_string()),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_application(pool: &PgPool, owner: &TestUser) -> Application {
    let lead = seed_lead(pool, owner, None).await;
    ApplicationRepo::create(
        pool,
        &CreateApplication {
            tenant_id: lead.tenant_id,
            lead_id: lead.id,
            program_id: None,
            intake_id: None,
            stage: None,
            status: None,
        },
    )
    .await
    .unwrap()
}

/// Insert a task directly, back-dating `created_at` so due times in the
/// past still satisfy `ck_tasks_due_after_created`.
pub async fn insert_task(
    pool: &PgPool,
    application: &Application,
    title: &str,
    due_at: Timestamp,
    status: &str,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO tasks (tenant_id, application_id, title, task_type, status, due_at, created_at)
         VALUES ($1, $2, $3, 'call', $4, $5, $5 - INTERVAL '1 day')
         RETURNING id",
    )
    .bind(application.tenant_id)
    .bind(application.id)
    .bind(title)
    .bind(status)
    .bind(due_at)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn in_one_hour() -> String {
    (Utc::now() + Duration::hours(1)).to_rfc3339()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn authed(method: Method, uri: &str, token: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, authed(Method::GET, uri, token).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, authed(Method::DELETE, uri, token).body(Body::empty()).unwrap()).await
}

pub async fn post_empty(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, authed(Method::POST, uri, token).body(Body::empty()).unwrap()).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = authed(Method::POST, uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = authed(Method::PUT, uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Call the task creation function with a raw body.
pub async fn call_create_task(app: Router, method: Method, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri("/functions/v1/create-task")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
