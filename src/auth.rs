//! Auth client: register, login, password recovery, logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! The only component allowed to write the session. A successful register
//! or login persists and broadcasts the returned session before the call
//! returns; every failure leaves the previous session untouched and hands
//! the original [`ApiError`] back to the caller.

use std::sync::Arc;

use serde_json::json;

use crate::net::error::ApiError;
use crate::net::transport::{ApiRequest, ApiTransport};
use crate::net::types::{AuthResponse, LoginRequest, PasswordResetConfirm, RegisterRequest};
use crate::net::{send_json, send_text, to_body};
use crate::session::{Session, SessionContext};
use crate::validate::ValidationError;

const REGISTER_PATH: &str = "/auth/register";
const LOGIN_PATH: &str = "/auth/login";
const FORGOT_PASSWORD_PATH: &str = "/auth/forgot-password";
const VALIDATE_RESET_TOKEN_PATH: &str = "/auth/reset-password/validate";
const RESET_PASSWORD_PATH: &str = "/auth/reset-password";

#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<dyn ApiTransport>,
    session: SessionContext,
}

impl AuthClient {
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>, session: SessionContext) -> Self {
        Self { transport, session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// `POST /auth/register`, then write the new session through.
    ///
    /// # Errors
    ///
    /// Returns the transport/status/decode error unchanged, or a storage
    /// error if the session could not be persisted.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Session, ApiError> {
        let body = to_body(request)?;
        let result = send_json::<AuthResponse>(&*self.transport, ApiRequest::post(REGISTER_PATH).with_json(body)).await;
        self.accept_session("register", &request.email, result)
    }

    /// `POST /auth/login`, then write the session through.
    ///
    /// # Errors
    ///
    /// Returns the transport/status/decode error unchanged, or a storage
    /// error if the session could not be persisted.
    pub async fn login(&self, request: &LoginRequest) -> Result<Session, ApiError> {
        let body = to_body(request)?;
        let result = send_json::<AuthResponse>(&*self.transport, ApiRequest::post(LOGIN_PATH).with_json(body)).await;
        self.accept_session("login", &request.email, result)
    }

    /// `POST /auth/forgot-password?email=`; returns the backend's text.
    ///
    /// # Errors
    ///
    /// Returns the transport or status error unchanged.
    pub async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        let request = ApiRequest::post(FORGOT_PASSWORD_PATH)
            .with_query("email", email)
            .with_json(json!({}));
        let text = send_text(&*self.transport, request).await?;
        tracing::info!(email = %email, "password reset link requested");
        Ok(text)
    }

    /// `GET /auth/reset-password/validate?token=`; returns the backend's text.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingResetToken`] for a blank token
    /// without calling the backend, else the transport or status error.
    pub async fn validate_reset_token(&self, token: &str) -> Result<String, ApiError> {
        if token.trim().is_empty() {
            return Err(ValidationError::MissingResetToken.into());
        }
        let request = ApiRequest::get(VALIDATE_RESET_TOKEN_PATH).with_query("token", token.trim());
        send_text(&*self.transport, request).await
    }

    /// `POST /auth/reset-password`; returns the backend's text.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PasswordMismatch`] without calling the
    /// backend when the confirmation differs, else the transport or status
    /// error.
    pub async fn reset_password(&self, request: &PasswordResetConfirm) -> Result<String, ApiError> {
        if request.new_password != request.confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }
        let body = to_body(request)?;
        let text = send_text(&*self.transport, ApiRequest::post(RESET_PASSWORD_PATH).with_json(body)).await?;
        tracing::info!("password reset completed");
        Ok(text)
    }

    /// Forget the current session. Safe to call when already logged out.
    pub fn logout(&self) {
        if let Some(session) = self.session.current() {
            tracing::info!(email = %session.email, "logged out");
        }
        self.session.clear();
    }

    fn accept_session(
        &self,
        operation: &'static str,
        email: &str,
        result: Result<Session, ApiError>,
    ) -> Result<Session, ApiError> {
        let session = match result {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(operation, email = %email, status = ?e.status(), "auth request failed");
                return Err(e);
            }
        };
        self.session.write_through(session.clone())?;
        tracing::info!(operation, email = %session.email, role = %session.role, "session established");
        Ok(session)
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;
