#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use shootbook_api::auth::jwt::{generate_access_token, JwtConfig};
use shootbook_api::cache::ProjectCache;
use shootbook_api::config::ServerConfig;
use shootbook_api::router::build_app_router;
use shootbook_api::state::AppState;
use shootbook_db::models::user::{CreateUser, User};
use shootbook_db::repositories::UserRepo;
use shootbook_events::{ApprovalGrantedNotice, ApprovalRequestNotice, Notifier, NotifyError};

// ---------------------------------------------------------------------------
// Notifier double
// ---------------------------------------------------------------------------

/// Records every notice instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    pub requests: Mutex<Vec<ApprovalRequestNotice>>,
    pub granted: Mutex<Vec<ApprovalGrantedNotice>>,
}

impl RecordingNotifier {
    pub fn requests(&self) -> Vec<ApprovalRequestNotice> {
        self.requests.lock().unwrap().clone()
    }

    pub fn granted(&self) -> Vec<ApprovalGrantedNotice> {
        self.granted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn channel(&self) -> &'static str {
        "recording"
    }

    async fn send_approval_request(
        &self,
        notice: &ApprovalRequestNotice,
    ) -> Result<(), NotifyError> {
        self.requests.lock().unwrap().push(notice.clone());
        Ok(())
    }

    async fn send_approval_granted(
        &self,
        notice: &ApprovalGrantedNotice,
    ) -> Result<(), NotifyError> {
        self.granted.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

/// Counts attempts and fails every one, like an unreachable mail server.
#[derive(Default)]
pub struct FailingNotifier {
    pub attempts: Mutex<usize>,
}

impl FailingNotifier {
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    fn fail(&self) -> Result<(), NotifyError> {
        *self.attempts.lock().unwrap() += 1;
        Err(NotifyError::Build("mail server unreachable".to_string()))
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    fn channel(&self) -> &'static str {
        "failing"
    }

    async fn send_approval_request(
        &self,
        _notice: &ApprovalRequestNotice,
    ) -> Result<(), NotifyError> {
        self.fail()
    }

    async fn send_approval_granted(
        &self,
        _notice: &ApprovalGrantedNotice,
    ) -> Result<(), NotifyError> {
        self.fail()
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub const TEST_BASE_URL: &str = "http://booking.test";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        base_url: TEST_BASE_URL.to_string(),
        project_cache_ttl_secs: 60,
        jwt: test_jwt_config(),
    }
}

/// A router plus the notifier it dispatches to.
pub struct TestApp {
    pub router: Router,
    pub notifier: Arc<RecordingNotifier>,
}

/// Build the full application router (same middleware stack as production)
/// over `pool`, with a recording notifier.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let notifier = Arc::new(RecordingNotifier::default());
    TestApp {
        router: build_router_with(pool, notifier.clone()),
        notifier,
    }
}

/// Build the application router over `pool` dispatching to `notifier`.
pub fn build_router_with(pool: PgPool, notifier: Arc<dyn Notifier>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifier,
        cache: Arc::new(ProjectCache::new(Duration::from_secs(
            config.project_cache_ttl_secs,
        ))),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, name: &str, admin: bool) -> User {
    let input = CreateUser {
        name: Some(name.to_string()),
        email: Some(format!("{}@studio.test", name.to_lowercase())),
        admin,
        image: None,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &test_jwt_config()).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A valid create/update body with only the required fields.
pub fn project_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "client": "Acme",
        "shoot_type": "Studio",
        "shoot_base": "Local",
    })
}

/// A body that passes the approval-readiness check.
pub fn ready_project_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "client": "Acme",
        "job_number": "JOB-001",
        "shoot_type": "Narrative",
        "shoot_base": "National",
        "finalised_concept": true,
        "concept": "A day in the life",
        "budget": "2",
        "due_date": "2026-05-01T00:00:00Z",
        "shoot_start": "2026-04-10T07:00:00Z",
        "shoot_end": "2026-04-12T18:00:00Z",
    })
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Create a project through the API and return its id.
pub async fn create_project(app: &Router, token: &str, body: serde_json::Value) -> i64 {
    let response = post_json_auth(app, "/api/v1/projects", token, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
