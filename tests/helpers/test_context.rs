//! Router test context
//!
//! Builds the full axum application over a fresh `MemoryDatabase` and
//! drives it with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use YogaStudio::config::{Environment, Settings};
use YogaStudio::database::{DatabaseService, MemoryDatabase, TeacherStore, UserStore};
use YogaStudio::models::{CreateTeacherRequest, CreateUserRequest, Teacher, User};
use YogaStudio::services::password::hash_password;
use YogaStudio::{create_router, AppState, ServiceFactory};

use super::init_test_logging;

pub const ADMIN_EMAIL: &str = "yoga@studio.com";
pub const ADMIN_PASSWORD: &str = "test!1234";

/// Response status plus parsed JSON body (`Null` when empty)
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub request_id: Option<String>,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

pub struct TestContext {
    pub app: Router,
    pub db: MemoryDatabase,
    pub settings: Settings,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(test_settings(Environment::Test))
    }

    pub fn with_environment(environment: Environment) -> Self {
        Self::with_settings(test_settings(environment))
    }

    pub fn with_settings(settings: Settings) -> Self {
        init_test_logging();

        let db = MemoryDatabase::new();
        let services = ServiceFactory::new(DatabaseService::in_memory(db.clone()), &settings).unwrap();
        let app = create_router(AppState::new(services, settings.clone()));

        Self { app, db, settings }
    }

    /// Send a request; `body` is serialized as JSON when present
    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, body, request_id }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Register through the API and return `(user id, token)`
    pub async fn register(&self, email: &str, password: &str) -> (i64, String) {
        let response = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "email": email,
                    "password": password,
                    "firstName": "John",
                    "lastName": "Doe",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        token_of(&response)
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.post("/api/auth/login", None, json!({ "email": email, "password": password }))
            .await
    }

    /// Provision the admin account directly in the store and sign in
    pub async fn admin(&self) -> (i64, String) {
        let user = self.insert_user(ADMIN_EMAIL, ADMIN_PASSWORD, true).await;
        let response = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        let (id, token) = token_of(&response);
        assert_eq!(id, user.id);
        (id, token)
    }

    pub async fn insert_user(&self, email: &str, password: &str, admin: bool) -> User {
        let password_hash = hash_password(password, self.settings.auth.bcrypt_cost).await.unwrap();
        UserStore::create(
            &self.db,
            CreateUserRequest {
                email: email.to_string(),
                password_hash,
                first_name: "Admin".to_string(),
                last_name: "Yoga".to_string(),
                admin,
            },
        )
        .await
        .unwrap()
    }

    pub async fn insert_teacher(&self, first_name: &str, last_name: &str) -> Teacher {
        TeacherStore::create(
            &self.db,
            CreateTeacherRequest {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            },
        )
        .await
        .unwrap()
    }

    /// Create a session through the API as `admin_token`; returns its id
    pub async fn create_session(&self, admin_token: &str, body: Value) -> i64 {
        let response = self.post("/api/session", Some(admin_token), body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_settings(environment: Environment) -> Settings {
    let mut settings = Settings::default();
    settings.app.environment = environment;
    settings.auth.bcrypt_cost = 4;
    settings.auth.login_attempts_per_minute = 0;
    settings
}

pub fn token_of(response: &TestResponse) -> (i64, String) {
    (
        response.body["id"].as_i64().unwrap(),
        response.body["token"].as_str().unwrap().to_string(),
    )
}
