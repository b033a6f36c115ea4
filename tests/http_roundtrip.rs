//! Drives the reqwest transport against an in-process axum backend.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use marketplace_client::config::{SellerLabel, Timeouts};
use marketplace_client::messages::{self, Operation};
use marketplace_client::net::transport::{ApiTransport, HttpTransport};
use marketplace_client::net::types::{CompleteProfileRequest, LoginRequest, PasswordResetConfirm, RegisterRequest};
use marketplace_client::{ApiError, AuthClient, ProfileClient, SessionContext};
use serde_json::{Value, json};

const TOKEN: &str = "tok-seller-1";

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret-pass" {
        Json(json!({
            "token": TOKEN,
            "email": body["email"],
            "name": "Sami Trabelsi",
            "role": "SELLER",
            "isProfileCompleted": false,
            "redirectTo": "/complete-profile",
        }))
        .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Bad credentials" }))).into_response()
    }
}

async fn register() -> Response {
    (StatusCode::CONFLICT, Json(json!({ "message": "Email already in use" }))).into_response()
}

async fn forgot_password(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("email") {
        Some(email) => format!("Reset link sent to {email}").into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn validate_token(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("token").map(String::as_str) == Some("good-token") {
        "Token is valid".into_response()
    } else {
        (StatusCode::NOT_FOUND, "Token not found").into_response()
    }
}

async fn reset_password(Json(body): Json<Value>) -> Response {
    if body["token"] == "good-token" && body["newPassword"] == body["confirmPassword"] {
        "Password has been reset".into_response()
    } else {
        StatusCode::BAD_REQUEST.into_response()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn get_profile(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "id": 7,
        "name": "Sami Trabelsi",
        "email": "sami@example.com",
        "phoneNumber": null,
        "isProfileCompleted": null,
    }))
    .into_response()
}

async fn complete_profile(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "id": 7,
        "name": "Sami Trabelsi",
        "email": "sami@example.com",
        "phoneNumber": body["phoneNumber"],
        "address": body["address"],
        "city": body["city"],
        "country": body["country"],
        "isProfileCompleted": true,
    }))
    .into_response()
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password/validate", get(validate_token))
        .route("/api/auth/reset-password", post(reset_password))
        .route("/api/profile", get(get_profile))
        .route("/api/profile/complete", post(complete_profile));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/")
}

fn clients(base_url: &str, session: &SessionContext) -> (AuthClient, ProfileClient) {
    let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::new(base_url, Timeouts::default()).unwrap());
    (
        AuthClient::new(Arc::clone(&transport), session.clone()),
        ProfileClient::new(transport, session.clone()),
    )
}

fn login_request(password: &str) -> LoginRequest {
    LoginRequest { email: "sami@example.com".into(), password: password.into() }
}

#[tokio::test]
async fn login_then_profile_uses_bearer_token() {
    let base = spawn_backend().await;
    let session = SessionContext::in_memory();
    let (auth, profile) = clients(&base, &session);

    let logged_in = auth.login(&login_request("secret-pass")).await.unwrap();
    assert_eq!(logged_in.token, TOKEN);
    assert!(session.is_logged_in());
    assert_eq!(session.redirect_path(), "/complete-profile");

    let record = profile.get_profile().await.unwrap();
    assert_eq!(record.id, 7);
    assert!(!record.is_profile_completed);
    assert_eq!(record.phone_number, None);
}

#[tokio::test]
async fn profile_without_session_is_unauthorized() {
    let base = spawn_backend().await;
    let session = SessionContext::in_memory();
    let (_, profile) = clients(&base, &session);

    let err = profile.get_profile().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(
        messages::error_message(Operation::GetProfile, &err),
        "Your session has expired. Please log in again."
    );
}

#[tokio::test]
async fn bad_credentials_leave_session_empty() {
    let base = spawn_backend().await;
    let session = SessionContext::in_memory();
    let (auth, _) = clients(&base, &session);

    let err = auth.login(&login_request("wrong")).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.server_message().as_deref(), Some("Bad credentials"));
    assert!(session.current().is_none());
}

#[tokio::test]
async fn register_conflict_passes_server_message_through() {
    let base = spawn_backend().await;
    let session = SessionContext::in_memory();
    let (auth, _) = clients(&base, &session);

    let request = RegisterRequest {
        name: "Sami Trabelsi".into(),
        email: "sami@example.com".into(),
        password: "secret-pass".into(),
        role: "SELLER".into(),
    };
    let err = auth.register(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 409, .. }));
    assert_eq!(messages::error_message(Operation::Register, &err), "Email already in use");
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn password_recovery_sends_query_params() {
    let base = spawn_backend().await;
    let session = SessionContext::in_memory();
    let (auth, _) = clients(&base, &session);

    let text = auth.forgot_password("sami+shop@example.com").await.unwrap();
    assert_eq!(text, "Reset link sent to sami+shop@example.com");

    assert_eq!(auth.validate_reset_token("good-token").await.unwrap(), "Token is valid");
    let err = auth.validate_reset_token("stale").await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    let confirm = PasswordResetConfirm {
        token: "good-token".into(),
        new_password: "brand-new-pass".into(),
        confirm_password: "brand-new-pass".into(),
    };
    assert_eq!(auth.reset_password(&confirm).await.unwrap(), "Password has been reset");
}

#[tokio::test]
async fn completed_profile_survives_reload_from_file() {
    let base = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let session = SessionContext::open_file(&path, SellerLabel::Seller);
    let (auth, profile) = clients(&base, &session);
    auth.login(&login_request("secret-pass")).await.unwrap();

    let request = CompleteProfileRequest {
        phone_number: "+216 22333444".into(),
        address: "12 Rue de Marseille".into(),
        city: "Tunis".into(),
        country: "Tunisia".into(),
    };
    let record = profile.complete_profile(&request).await.unwrap();
    assert!(record.is_profile_completed);
    assert_eq!(record.city.as_deref(), Some("Tunis"));
    assert!(session.mark_profile_completed().unwrap());

    let reloaded = SessionContext::open_file(&path, SellerLabel::Seller);
    assert!(reloaded.is_profile_completed());
    assert_eq!(reloaded.redirect_path(), "/seller/dashboard");

    auth.logout();
    let after_logout = SessionContext::open_file(&path, SellerLabel::Seller);
    assert!(!after_logout.is_logged_in());
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let session = SessionContext::in_memory();
    let (auth, _) = clients(&format!("http://{addr}/api"), &session);
    let err = auth.login(&login_request("secret-pass")).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), Some(0));
    assert_eq!(messages::error_message(Operation::Login, &err), messages::CANNOT_CONNECT);
}
