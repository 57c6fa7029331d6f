//! HTTP API tests
//!
//! Exercise the full router (extractors, middleware, error mapping) over
//! the in-memory store.

mod helpers;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use helpers::*;
use YogaStudio::config::Environment;
use YogaStudio::services::Claims;

#[tokio::test]
async fn test_booking_walkthrough() {
    let ctx = TestContext::new();
    let teacher = ctx.insert_teacher("Margot", "Delahaye").await;
    let (_, admin_token) = ctx.admin().await;
    let session_id = ctx.create_session(&admin_token, session_body(teacher.id)).await;
    assert_eq!(session_id, 1);

    let registered = ctx
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "user@test.com",
                "password": "password123",
                "firstName": "John",
                "lastName": "Doe",
            }),
        )
        .await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.body["admin"], false);
    let (user_id, _) = token_of(&registered);

    let login = ctx.login("user@test.com", "password123").await;
    assert_eq!(login.status, StatusCode::OK);
    let (login_id, token) = token_of(&login);
    assert_eq!(login_id, user_id);
    assert_eq!(login.body["email"], "user@test.com");

    let sessions = ctx.get("/api/session", &token).await;
    assert_eq!(sessions.status, StatusCode::OK);
    assert_eq!(sessions.body.as_array().unwrap().len(), 1);
    assert_eq!(sessions.body[0]["teacher"]["firstName"], "Margot");

    let participate = format!("/api/session/1/participate/{}", user_id);

    let joined = ctx.request(Method::POST, &participate, Some(&token), None).await;
    assert_eq!(joined.status, StatusCode::OK);
    assert_eq!(joined.message(), "Successfully joined the session");

    let again = ctx.request(Method::POST, &participate, Some(&token), None).await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.message(), "User already participating in this session");

    let session = ctx.get("/api/session/1", &token).await;
    assert_eq!(session.body["users"], json!([user_id]));

    let left = ctx.delete(&participate, &token).await;
    assert_eq!(left.status, StatusCode::OK);
    assert_eq!(left.message(), "Successfully left the session");

    let left_again = ctx.delete(&participate, &token).await;
    assert_eq!(left_again.status, StatusCode::NOT_FOUND);
    assert_eq!(left_again.message(), "Participation not found");
}

#[tokio::test]
async fn test_registration_validation_and_conflict() {
    let ctx = TestContext::new();

    let missing = ctx.post("/api/auth/register", None, json!({ "password": "password123" })).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.message(), "Email is required");

    let mut short = registration_body();
    short["password"] = json!("short");
    let short = ctx.post("/api/auth/register", None, short).await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.message(), "Password must be at least 8 characters");

    let mut malformed = registration_body();
    malformed["email"] = json!("not-an-email");
    let malformed = ctx.post("/api/auth/register", None, malformed).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.message(), "Invalid email");

    let body = registration_body();
    assert_eq!(ctx.post("/api/auth/register", None, body.clone()).await.status, StatusCode::CREATED);
    let duplicate = ctx.post("/api/auth/register", None, body).await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.message(), "Email already exists");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.register("user@test.com", "password123").await;

    let wrong_password = ctx.login("user@test.com", "password124").await;
    let unknown_email = ctx.login("nobody@test.com", "password123").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status, unknown_email.status);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.message(), "Invalid credentials");

    let missing = ctx.post("/api/auth/login", None, json!({ "email": "user@test.com" })).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.message(), "Password is required");
}

#[tokio::test]
async fn test_authentication_header_handling() {
    let ctx = TestContext::new();
    let (user_id, token) = ctx.register("user@test.com", "password123").await;

    let none = ctx.request(Method::GET, "/api/session", None, None).await;
    assert_eq!(none.status, StatusCode::UNAUTHORIZED);
    assert_eq!(none.message(), "No token provided");

    let request = Request::builder()
        .uri("/api/session")
        .header(header::AUTHORIZATION, token.clone())
        .body(Body::empty())
        .unwrap();
    let no_scheme = ctx.send(request).await;
    assert_eq!(no_scheme.status, StatusCode::UNAUTHORIZED);
    assert_eq!(no_scheme.message(), "Invalid token format");

    let mut tampered = token.clone();
    tampered.push('x');
    let tampered = ctx.get("/api/session", &tampered).await;
    assert_eq!(tampered.status, StatusCode::UNAUTHORIZED);
    assert_eq!(tampered.message(), "Invalid or expired token");

    let now = Utc::now().timestamp();
    let expired = encode(
        &Header::default(),
        &Claims { user_id, iat: now - 2 * 86_400, exp: now - 86_400 },
        &EncodingKey::from_secret(ctx.settings.auth.jwt_secret.as_bytes()),
    )
    .unwrap();
    let expired = ctx.get("/api/session", &expired).await;
    assert_eq!(expired.status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired.message(), "Invalid or expired token");

    assert_eq!(ctx.get("/api/session", &token).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_non_admin_cannot_manage_sessions() {
    let ctx = TestContext::new();
    let teacher = ctx.insert_teacher("David", "Martin").await;
    let (_, admin_token) = ctx.admin().await;
    let session_id = ctx.create_session(&admin_token, session_body(teacher.id)).await;
    let (_, token) = ctx.register("user@test.com", "password123").await;

    let bodies = [session_body(teacher.id), json!({}), json!({ "name": "x", "teacherId": 9999 })];
    for body in bodies {
        let created = ctx.post("/api/session", Some(&token), body.clone()).await;
        assert_eq!(created.status, StatusCode::FORBIDDEN, "{:?}", created.body);
        assert_eq!(created.message(), "Admin access required");

        let uri = format!("/api/session/{}", session_id);
        let updated = ctx.request(Method::PUT, &uri, Some(&token), Some(body)).await;
        assert_eq!(updated.status, StatusCode::FORBIDDEN);
    }

    let deleted = ctx.delete(&format!("/api/session/{}", session_id), &token).await;
    assert_eq!(deleted.status, StatusCode::FORBIDDEN);
    let deleted_missing = ctx.delete("/api/session/9999", &token).await;
    assert_eq!(deleted_missing.status, StatusCode::FORBIDDEN);

    let sessions = ctx.get("/api/session", &token).await;
    assert_eq!(sessions.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_admin_is_refused_before_body_is_read() {
    let ctx = TestContext::new();
    let teacher = ctx.insert_teacher("David", "Martin").await;
    let (_, admin_token) = ctx.admin().await;
    let session_id = ctx.create_session(&admin_token, session_body(teacher.id)).await;
    let (_, token) = ctx.register("user@test.com", "password123").await;
    let uri = format!("/api/session/{}", session_id);

    let wrong_type = ctx.post("/api/session", Some(&token), json!({ "teacherId": "3" })).await;
    assert_eq!(wrong_type.status, StatusCode::FORBIDDEN, "{:?}", wrong_type.body);
    assert_eq!(wrong_type.message(), "Admin access required");

    let wrong_name = ctx.request(Method::PUT, &uri, Some(&token), Some(json!({ "name": 12 }))).await;
    assert_eq!(wrong_name.status, StatusCode::FORBIDDEN);

    // No body and no content type
    let empty = ctx.request(Method::PUT, &uri, Some(&token), None).await;
    assert_eq!(empty.status, StatusCode::FORBIDDEN);
    assert_eq!(empty.message(), "Admin access required");

    let syntax = Request::builder()
        .method(Method::POST)
        .uri("/api/session")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    assert_eq!(ctx.send(syntax).await.status, StatusCode::FORBIDDEN);

    // Admins still get the body errors
    let admin_wrong_type = ctx.post("/api/session", Some(&admin_token), json!({ "teacherId": "3" })).await;
    assert_eq!(admin_wrong_type.status, StatusCode::BAD_REQUEST);
    let admin_empty = ctx.request(Method::PUT, &uri, Some(&admin_token), None).await;
    assert_eq!(admin_empty.status, StatusCode::BAD_REQUEST);

    let anonymous = ctx.request(Method::PUT, &uri, None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_session_lifecycle() {
    let ctx = TestContext::new();
    let margot = ctx.insert_teacher("Margot", "Delahaye").await;
    let david = ctx.insert_teacher("David", "Martin").await;
    let (_, token) = ctx.admin().await;

    let created = ctx.post("/api/session", Some(&token), session_body(margot.id)).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();

    let fetched = ctx.get(&format!("/api/session/{}", id), &token).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);
    assert_eq!(fetched.body["name"], "Yoga Vinyasa");
    assert_eq!(fetched.body["date"], "2026-02-15");
    assert_eq!(fetched.body["teacher"], json!({ "id": margot.id, "firstName": "Margot", "lastName": "Delahaye" }));
    assert_eq!(fetched.body["users"], json!([]));

    let uri = format!("/api/session/{}", id);
    let updated = ctx
        .request(Method::PUT, &uri, Some(&token), Some(json!({ "teacherId": david.id, "date": "2026-03-01T10:00:00Z" })))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["teacher"]["id"], david.id);
    assert_eq!(updated.body["date"], "2026-03-01");
    assert_eq!(updated.body["name"], "Yoga Vinyasa");

    let bad_teacher = ctx.request(Method::PUT, &uri, Some(&token), Some(json!({ "teacherId": 9999 }))).await;
    assert_eq!(bad_teacher.status, StatusCode::NOT_FOUND);
    assert_eq!(bad_teacher.message(), "Teacher not found");

    let missing = ctx
        .request(Method::PUT, "/api/session/9999", Some(&token), Some(json!({ "name": "Yin Yoga" })))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.message(), "Session not found");

    let unknown_teacher = ctx.post("/api/session", Some(&token), session_body(9999)).await;
    assert_eq!(unknown_teacher.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_teacher.message(), "Teacher not found");

    let incomplete = ctx.post("/api/session", Some(&token), json!({ "name": "Yin Yoga" })).await;
    assert_eq!(incomplete.status, StatusCode::BAD_REQUEST);
    assert_eq!(incomplete.message(), "Date is required");

    let deleted = ctx.delete(&uri, &token).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.message(), "Session deleted successfully");
    assert_eq!(ctx.get(&uri, &token).await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.delete(&uri, &token).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_path_ids() {
    let ctx = TestContext::new();
    let (_, token) = ctx.register("user@test.com", "password123").await;

    let session = ctx.get("/api/session/abc", &token).await;
    assert_eq!(session.status, StatusCode::BAD_REQUEST);
    assert_eq!(session.message(), "Invalid session ID");

    let teacher = ctx.get("/api/teacher/abc", &token).await;
    assert_eq!(teacher.message(), "Invalid teacher ID");

    let user = ctx.get("/api/user/abc", &token).await;
    assert_eq!(user.message(), "Invalid user ID");

    let participate = ctx.request(Method::POST, "/api/session/1/participate/me", Some(&token), None).await;
    assert_eq!(participate.status, StatusCode::BAD_REQUEST);
    assert_eq!(participate.message(), "Invalid user ID");
}

#[tokio::test]
async fn test_join_requires_existing_session_and_user() {
    let ctx = TestContext::new();
    let teacher = ctx.insert_teacher("Margot", "Delahaye").await;
    let (admin_id, admin_token) = ctx.admin().await;
    let session_id = ctx.create_session(&admin_token, session_body(teacher.id)).await;

    let no_session = ctx
        .request(Method::POST, &format!("/api/session/9999/participate/{}", admin_id), Some(&admin_token), None)
        .await;
    assert_eq!(no_session.status, StatusCode::NOT_FOUND);
    assert_eq!(no_session.message(), "Session not found");

    let no_user = ctx
        .request(Method::POST, &format!("/api/session/{}/participate/9999", session_id), Some(&admin_token), None)
        .await;
    assert_eq!(no_user.status, StatusCode::NOT_FOUND);
    assert_eq!(no_user.message(), "User not found");
}

#[tokio::test]
async fn test_account_deletion_is_self_only() {
    let ctx = TestContext::new();
    let (alice_id, alice_token) = ctx.register("alice@test.com", "password123").await;
    let (bob_id, _) = ctx.register("bob@test.com", "password123").await;

    let other = ctx.delete(&format!("/api/user/{}", bob_id), &alice_token).await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
    assert_eq!(other.message(), "You can only delete your own account");

    let profile = ctx.get(&format!("/api/user/{}", bob_id), &alice_token).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["email"], "bob@test.com");
    assert!(profile.body.get("passwordHash").is_none());
    assert!(profile.body.get("password_hash").is_none());

    let own = ctx.delete(&format!("/api/user/{}", alice_id), &alice_token).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.message(), "User deleted successfully");

    let repeat = ctx.delete(&format!("/api/user/{}", alice_id), &alice_token).await;
    assert_eq!(repeat.status, StatusCode::NOT_FOUND);
    assert_eq!(repeat.message(), "User not found");
}

#[tokio::test]
async fn test_promote_admin_in_development() {
    let ctx = TestContext::with_environment(Environment::Development);
    let teacher = ctx.insert_teacher("Margot", "Delahaye").await;
    let (_, token) = ctx.register("user@test.com", "password123").await;

    let denied = ctx.post("/api/session", Some(&token), session_body(teacher.id)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let promoted = ctx.request(Method::POST, "/api/user/promote-admin", Some(&token), None).await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.body["admin"], true);

    let created = ctx.post("/api/session", Some(&token), session_body(teacher.id)).await;
    assert_eq!(created.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_promote_admin_forbidden_in_production() {
    let ctx = TestContext::with_environment(Environment::Production);
    let (user_id, token) = ctx.register("user@test.com", "password123").await;

    let promoted = ctx.request(Method::POST, "/api/user/promote-admin", Some(&token), None).await;
    assert_eq!(promoted.status, StatusCode::FORBIDDEN);

    let profile = ctx.get(&format!("/api/user/{}", user_id), &token).await;
    assert_eq!(profile.body["admin"], false);
}

#[tokio::test]
async fn test_teacher_directory() {
    let ctx = TestContext::new();
    let first = ctx.insert_teacher("Margot", "Delahaye").await;
    let second = ctx.insert_teacher("Hélène", "Thiercelin").await;
    let (_, token) = ctx.register("user@test.com", "password123").await;

    let listed = ctx.get("/api/teacher", &token).await;
    assert_eq!(listed.status, StatusCode::OK);
    let ids: Vec<i64> = listed.body.as_array().unwrap().iter().map(|t| t["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let teacher = ctx.get(&format!("/api/teacher/{}", second.id), &token).await;
    assert_eq!(teacher.body["firstName"], "Hélène");
    assert!(teacher.body.get("createdAt").is_some());

    let missing = ctx.get("/api/teacher/9999", &token).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.message(), "Teacher not found");
}

#[tokio::test]
async fn test_malformed_json_is_a_validation_error() {
    let ctx = TestContext::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = ctx.send(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.message().is_empty());

    let wrong_type = ctx.post("/api/auth/login", None, json!({ "email": 42, "password": "x" })).await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_is_rate_limited_per_email() {
    let mut settings = test_settings(Environment::Test);
    settings.auth.login_attempts_per_minute = 2;
    let ctx = TestContext::with_settings(settings);
    ctx.register("user@test.com", "password123").await;

    assert_eq!(ctx.login("user@test.com", "wrong-password").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.login("user@test.com", "wrong-password").await.status, StatusCode::UNAUTHORIZED);

    let limited = ctx.login("user@test.com", "password123").await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.message(), "Too many requests");

    assert_eq!(ctx.login("other@test.com", "password123").await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_fallback_and_request_id() {
    let ctx = TestContext::new();

    let health = ctx.request(Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body, json!({ "status": "ok" }));
    assert_eq!(health.request_id.as_deref().map(str::len), Some(36));

    let unknown = ctx.request(Method::GET, "/api/nowhere", None, None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.body, json!({ "message": "Not found" }));

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "client-supplied")
        .body(Body::empty())
        .unwrap();
    assert_eq!(ctx.send(request).await.request_id.as_deref(), Some("client-supplied"));
}
