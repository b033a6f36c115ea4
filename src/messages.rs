//! User-facing text for client outcomes.
//!
//! The clients forward raw [`ApiError`]s; front-ends call [`error_message`]
//! to pick the text shown for a failed operation. Status codes only carry
//! meaning here, per operation.

use crate::net::error::ApiError;

pub const CANNOT_CONNECT: &str = "Cannot connect to server. Please try again later.";
const UNEXPECTED_RESPONSE: &str = "Unexpected response from server. Please try again.";
const SESSION_NOT_SAVED: &str = "Signed in, but the session could not be saved on this device.";

pub const REGISTER_SUCCESS: &str = "Account created successfully! Redirecting...";
pub const FORGOT_PASSWORD_SUCCESS: &str =
    "Password reset link has been sent to your email. Please check your inbox and spam folder.";
pub const RESET_PASSWORD_SUCCESS: &str = "Password reset successfully! Redirecting to login...";
pub const PROFILE_COMPLETED: &str = "Profile completed successfully! Redirecting...";
pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const PASSWORD_CHANGED: &str = "Password changed successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    ForgotPassword,
    ValidateResetToken,
    ResetPassword,
    GetProfile,
    UpdateProfile,
    CompleteProfile,
    ChangePassword,
}

/// Text to show for `err` raised by `op`.
#[must_use]
pub fn error_message(op: Operation, err: &ApiError) -> String {
    match err {
        ApiError::Transport(_) => return CANNOT_CONNECT.to_owned(),
        ApiError::Validation(v) => return v.to_string(),
        ApiError::Decode(_) => return UNEXPECTED_RESPONSE.to_owned(),
        ApiError::Storage(_) => return SESSION_NOT_SAVED.to_owned(),
        ApiError::ClientBuild(_) => return err.to_string(),
        ApiError::Status { .. } => {}
    }

    let status = err.status().unwrap_or_default();
    let server = err.server_message();
    let or_server = |fallback: &str| server.clone().unwrap_or_else(|| fallback.to_owned());

    match (op, status) {
        (Operation::Login, 401) => "Invalid email or password".to_owned(),
        (Operation::Login, 403) => "Account is not active or verified".to_owned(),
        (Operation::Login, _) => or_server("An error occurred during login. Please try again."),

        (Operation::Register, 400 | 409) => or_server("Email already exists. Please use a different email."),
        (Operation::Register, 422) => "Invalid data. Please check your information.".to_owned(),
        (Operation::Register, _) => or_server("An error occurred during registration. Please try again."),

        (Operation::ForgotPassword, 404) => "No account found with this email address".to_owned(),
        (Operation::ForgotPassword, 400) => "Invalid email address".to_owned(),
        (Operation::ForgotPassword, 429) => "Too many requests. Please try again later".to_owned(),
        (Operation::ForgotPassword, _) => or_server("An error occurred. Please try again."),

        (Operation::ValidateResetToken, 400 | 404) => {
            "Invalid or expired reset token. Please request a new password reset.".to_owned()
        }
        (Operation::ValidateResetToken, _) => "Unable to validate reset token. Please try again.".to_owned(),

        (Operation::ResetPassword, 400) => or_server("Invalid token or passwords do not match"),
        (Operation::ResetPassword, 404) => "Reset token not found or has expired".to_owned(),
        (Operation::ResetPassword, _) => or_server("An error occurred. Please try again."),

        (_, 401) => "Your session has expired. Please log in again.".to_owned(),
        (_, 403) => or_server("You are not allowed to perform this action."),
        (_, 400 | 422) => or_server("Invalid data. Please check your information."),
        (Operation::GetProfile, _) => or_server("An error occurred while loading your profile."),
        (Operation::ChangePassword, _) => or_server("An error occurred while changing your password."),
        (_, _) => or_server("An error occurred while saving your profile."),
    }
}

#[cfg(test)]
#[path = "messages_test.rs"]
mod tests;
