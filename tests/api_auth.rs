//! End-to-end authentication and account approval flows over the router.
//!
//! Each test assembles the full service graph over an in-memory database
//! and drives it through `oneshot`, covering the envelope, status codes
//! and middleware ordering along the way.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use comanda::db::DbService;
use comanda::{Config, ServerState, api};

const ADMIN_EMAIL: &str = "admin@test.local";
const ADMIN_PASSWORD: &str = "admin-secret";

async fn setup() -> (Router, ServerState) {
    let db = DbService::new_in_memory().await.unwrap();
    let state = ServerState::with_db(Config::default(), db);
    state
        .auth
        .seed_admin(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    (api::build_router(state.clone()), state)
}

fn request(method: &str, path: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(&value).unwrap()),
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    let req = request(
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    );
    call(app, req).await
}

#[tokio::test]
async fn health_is_public() {
    let (app, _state) = setup().await;

    let (status, body) = call(&app, request("GET", "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn seeded_admin_can_log_in() {
    let (app, _state) = setup().await;

    let (status, body) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["user"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["user"]["role"], "admin");
    // The hash never leaves the server
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let (app, _state) = setup().await;

    let (wrong_pw_status, wrong_pw) = login(&app, ADMIN_EMAIL, "not-the-password").await;
    let (unknown_status, unknown) = login(&app, "ghost@test.local", "whatever").await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw["success"], false);
    // Identical wording, so the response does not reveal which check failed
    assert_eq!(wrong_pw["error"], unknown["error"]);
}

#[tokio::test]
async fn registration_needs_approval_before_login() {
    let (app, _state) = setup().await;

    let (status, body) = call(
        &app,
        request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Joana",
                "email": "joana@test.local",
                "password": "segredo123"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["role"], "waiter");
    let user_id = body["data"]["id"].as_i64().unwrap();

    // Correct password, but the account is still pending
    let (status, body) = login(&app, "joana@test.local", "segredo123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Account pending approval");

    let (_, token_body) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let admin_token = token_body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        request("GET", "/auth/pending-users", Some(&admin_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["email"], "joana@test.local");

    let (status, body) = call(
        &app,
        request(
            "PATCH",
            &format!("/auth/approve-user/{user_id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "active");

    let (status, _) = login(&app, "joana@test.local", "segredo123").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn rejected_account_is_gone() {
    let (app, _state) = setup().await;

    let (_, body) = call(
        &app,
        request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Rui",
                "email": "rui@test.local",
                "password": "segredo123"
            })),
        ),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (_, token_body) = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let admin_token = token_body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        request(
            "DELETE",
            &format!("/auth/reject-user/{user_id}"),
            Some(&admin_token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account rejected");

    // The account no longer exists, so login fails like any unknown email
    let (status, body) = login(&app, "rui@test.local", "segredo123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (_, body) = call(
        &app,
        request("GET", "/auth/pending-users", Some(&admin_token), None),
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn admin_routes_reject_other_roles() {
    let (app, state) = setup().await;

    // No token at all
    let (status, body) = call(&app, request("GET", "/auth/pending-users", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    // Waiter token: authenticated but not authorized
    let (_, body) = call(
        &app,
        request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Bia",
                "email": "bia@test.local",
                "password": "segredo123"
            })),
        ),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();
    state.auth.approve(1, user_id).await.unwrap();

    let (_, body) = login(&app, "bia@test.local", "segredo123").await;
    let waiter_token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        request("GET", "/auth/pending-users", Some(&waiter_token), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_payloads_fail_validation() {
    let (app, _state) = setup().await;

    let (status, body) = call(
        &app,
        request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "X",
                "email": "not-an-email",
                "password": "123"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = login(&app, "also-not-an-email", "segredo123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_routes_answer_with_the_envelope() {
    let (app, _state) = setup().await;

    let (status, body) = call(&app, request("GET", "/nao-existe", None, None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() {
    let (app, _state) = setup().await;

    let (status, body) = call(
        &app,
        request("GET", "/pedidos", Some("not.a.token"), None),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}
