//! Role-based navigation targets.
//!
//! Pure functions: every input, including unknown or missing roles, maps to
//! a non-empty route path.

use crate::config::SellerLabel;
use crate::session::{Role, Session};

pub const LOGIN_PATH: &str = "/login";
pub const COMPLETE_PROFILE_PATH: &str = "/complete-profile";
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
pub const CLIENT_DASHBOARD_PATH: &str = "/client/dashboard";

/// Dashboard for a raw role string; unknown or missing roles go to login.
#[must_use]
pub fn dashboard_for(role: Option<&str>, seller: SellerLabel) -> &'static str {
    match role.and_then(Role::parse) {
        Some(Role::Admin) => ADMIN_DASHBOARD_PATH,
        Some(Role::Seller) => seller.dashboard_path(),
        Some(Role::Client) => CLIENT_DASHBOARD_PATH,
        None => LOGIN_PATH,
    }
}

/// Where to go right after login: profile completion first, then dashboard.
#[must_use]
pub fn post_login_path(session: &Session, seller: SellerLabel) -> &'static str {
    if session.is_profile_completed {
        dashboard_for(Some(&session.role), seller)
    } else {
        COMPLETE_PROFILE_PATH
    }
}

#[cfg(test)]
#[path = "redirect_test.rs"]
mod tests;
