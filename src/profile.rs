//! Profile client: read, update and complete the account profile.
//!
//! Pass-through calls authenticated with the stored bearer token. Responses
//! are returned to the caller and never cached; the session is only read.

use std::sync::Arc;

use crate::net::error::ApiError;
use crate::net::transport::{ApiRequest, ApiTransport};
use crate::net::types::{ChangePasswordRequest, CompleteProfileRequest, MessageResponse, ProfileRecord};
use crate::net::{send_json, to_body};
use crate::session::SessionContext;

const PROFILE_PATH: &str = "/profile";
const COMPLETE_PROFILE_PATH: &str = "/profile/complete";
const CHANGE_PASSWORD_PATH: &str = "/profile/change-password";

#[derive(Clone)]
pub struct ProfileClient {
    transport: Arc<dyn ApiTransport>,
    session: SessionContext,
}

impl ProfileClient {
    #[must_use]
    pub fn new(transport: Arc<dyn ApiTransport>, session: SessionContext) -> Self {
        Self { transport, session }
    }

    /// `GET /profile`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status or decode error unchanged.
    pub async fn get_profile(&self) -> Result<ProfileRecord, ApiError> {
        send_json(&*self.transport, self.authed(ApiRequest::get(PROFILE_PATH))).await
    }

    /// `PUT /profile`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status or decode error unchanged.
    pub async fn update_profile(&self, request: &CompleteProfileRequest) -> Result<ProfileRecord, ApiError> {
        let request = self.authed(ApiRequest::put(PROFILE_PATH)).with_json(to_body(request)?);
        let profile = send_json(&*self.transport, request).await?;
        tracing::info!("profile updated");
        Ok(profile)
    }

    /// `POST /profile/complete`. Does not touch the cached session; callers
    /// follow up with [`SessionContext::mark_profile_completed`].
    ///
    /// # Errors
    ///
    /// Returns the transport, status or decode error unchanged.
    pub async fn complete_profile(&self, request: &CompleteProfileRequest) -> Result<ProfileRecord, ApiError> {
        let request = self.authed(ApiRequest::post(COMPLETE_PROFILE_PATH)).with_json(to_body(request)?);
        let profile: ProfileRecord = send_json(&*self.transport, request).await?;
        tracing::info!(profile_id = profile.id, "profile completed");
        Ok(profile)
    }

    /// `PUT /profile/change-password`; returns the backend's message.
    ///
    /// # Errors
    ///
    /// Returns the transport, status or decode error unchanged.
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<MessageResponse, ApiError> {
        let request = self.authed(ApiRequest::put(CHANGE_PASSWORD_PATH)).with_json(to_body(request)?);
        send_json(&*self.transport, request).await
    }

    fn authed(&self, request: ApiRequest) -> ApiRequest {
        request.with_bearer(self.session.token())
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;
