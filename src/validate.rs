//! Client-side form guards.
//!
//! Each builder checks raw form input and returns a normalized request, so
//! an invalid form never reaches the network.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::SellerLabel;
use crate::net::types::{
    ChangePasswordRequest, CompleteProfileRequest, LoginRequest, PasswordResetConfirm, RegisterRequest,
};
use crate::session::Role;

pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,9}$").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Please enter your email address")]
    MissingEmail,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter your first name and last name")]
    IncompleteName,
    #[error("Please select a valid account type")]
    InvalidRole,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Invalid or missing reset token")]
    MissingResetToken,
    #[error("Please fill in all required fields correctly")]
    IncompleteProfile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Medium => "medium",
            Self::Strong => "strong",
        }
    }
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Strength meter shown next to password fields. `None` for empty input.
#[must_use]
pub fn password_strength(password: &str) -> Option<PasswordStrength> {
    let len = password.chars().count();
    if len == 0 {
        return None;
    }
    if len < 6 {
        return Some(PasswordStrength::Weak);
    }
    if len < 10 {
        return Some(PasswordStrength::Medium);
    }

    let classes = [
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| "!@#$%^&*(),.?\":{}|<>".contains(c)),
    ];
    if classes.iter().filter(|present| **present).count() >= 3 {
        Some(PasswordStrength::Strong)
    } else {
        Some(PasswordStrength::Medium)
    }
}

/// # Errors
///
/// Returns the first failing rule: missing field, single-word name, bad
/// email, unknown role, or short password.
pub fn register(
    name: &str,
    email: &str,
    password: &str,
    role: &str,
    seller: SellerLabel,
) -> Result<RegisterRequest, ValidationError> {
    if name.is_empty() || email.is_empty() || password.is_empty() || role.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    let name = name.trim();
    if name.split_whitespace().count() < 2 {
        return Err(ValidationError::IncompleteName);
    }
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    let role = Role::parse(role).ok_or(ValidationError::InvalidRole)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(RegisterRequest {
        name: name.to_owned(),
        email: email.to_lowercase(),
        password: password.to_owned(),
        role: role.wire_name(seller).to_owned(),
    })
}

/// # Errors
///
/// Returns an error when a field is empty or the email is malformed.
pub fn login(email: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

/// Normalized address for a reset-link request.
///
/// # Errors
///
/// Returns an error when the email is empty or malformed.
pub fn forgot_password_email(email: &str) -> Result<String, ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email.to_lowercase())
}

/// # Errors
///
/// Returns an error for a missing token, empty or short password, or a
/// confirmation that does not match.
pub fn reset_password(
    token: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<PasswordResetConfirm, ValidationError> {
    if token.trim().is_empty() {
        return Err(ValidationError::MissingResetToken);
    }
    check_new_password(new_password, confirm_password)?;
    Ok(PasswordResetConfirm {
        token: token.trim().to_owned(),
        new_password: new_password.to_owned(),
        confirm_password: confirm_password.to_owned(),
    })
}

/// # Errors
///
/// Returns an error for an empty field, a short new password, or a
/// confirmation that does not match.
pub fn change_password(
    old_password: &str,
    new_password: &str,
    confirm_password: &str,
) -> Result<ChangePasswordRequest, ValidationError> {
    if old_password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    check_new_password(new_password, confirm_password)?;
    Ok(ChangePasswordRequest {
        old_password: old_password.to_owned(),
        new_password: new_password.to_owned(),
        confirm_password: confirm_password.to_owned(),
    })
}

/// # Errors
///
/// Returns [`ValidationError::IncompleteProfile`] when any field is blank
/// or the phone number is malformed.
pub fn complete_profile(
    country: &str,
    city: &str,
    address: &str,
    phone: &str,
) -> Result<CompleteProfileRequest, ValidationError> {
    let (country, city, address, phone) = (country.trim(), city.trim(), address.trim(), phone.trim());
    if country.is_empty() || city.is_empty() || address.is_empty() || !is_valid_phone(phone) {
        return Err(ValidationError::IncompleteProfile);
    }
    Ok(CompleteProfileRequest {
        phone_number: phone.to_owned(),
        address: address.to_owned(),
        city: city.to_owned(),
        country: country.to_owned(),
    })
}

fn check_new_password(new_password: &str, confirm_password: &str) -> Result<(), ValidationError> {
    if new_password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if new_password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
