//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

const SESSION_DIR_NAME: &str = ".marketplace";
const SESSION_FILE_NAME: &str = "session.json";
const FALLBACK_SESSION_FILE: &str = ".marketplace-session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// Wire name the backend uses for the selling role.
///
/// Older backends call it `SELLER`, newer ones `FREELANCER`; the dashboard
/// route follows the same name. Both spellings are always accepted when
/// reading a role back, this only decides what the client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SellerLabel {
    #[default]
    Seller,
    Freelancer,
}

impl SellerLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seller => "SELLER",
            Self::Freelancer => "FREELANCER",
        }
    }

    #[must_use]
    pub fn dashboard_path(self) -> &'static str {
        match self {
            Self::Seller => "/seller/dashboard",
            Self::Freelancer => "/freelancer/dashboard",
        }
    }
}

impl FromStr for SellerLabel {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "" | "SELLER" => Ok(Self::Seller),
            "FREELANCER" => Ok(Self::Freelancer),
            other => Err(ConfigError::Parse(format!(
                "unknown seller label '{other}' (expected 'SELLER' or 'FREELANCER')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
    pub seller_label: SellerLabel,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Config pointing at `api_url` with every other value defaulted.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(&api_url.into()),
            session_file: default_session_file(std::env::var_os("HOME").map(PathBuf::from)),
            seller_label: SellerLabel::default(),
            timeouts: Timeouts::default(),
        }
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `MARKETPLACE_API_URL`: default `http://localhost:8080/api`
    /// - `MARKETPLACE_SESSION_FILE`: default `$HOME/.marketplace/session.json`
    /// - `MARKETPLACE_SELLER_LABEL`: `SELLER` (default) or `FREELANCER`
    /// - `MARKETPLACE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MARKETPLACE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `MARKETPLACE_SELLER_LABEL` names an unknown label.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if `MARKETPLACE_SELLER_LABEL` names an unknown label.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = normalize_url(&lookup("MARKETPLACE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()));
        let session_file = lookup("MARKETPLACE_SESSION_FILE")
            .filter(|raw| !raw.trim().is_empty())
            .map_or_else(|| default_session_file(lookup("HOME").map(PathBuf::from)), PathBuf::from);
        let seller_label = parse_seller_label(lookup("MARKETPLACE_SELLER_LABEL").as_deref())?;
        let timeouts = Timeouts {
            request_secs: parse_u64(lookup("MARKETPLACE_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("MARKETPLACE_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_url, session_file, seller_label, timeouts })
    }
}

fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn default_session_file(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) => home.join(SESSION_DIR_NAME).join(SESSION_FILE_NAME),
        None => PathBuf::from(FALLBACK_SESSION_FILE),
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

pub(crate) fn parse_seller_label(raw: Option<&str>) -> Result<SellerLabel, ConfigError> {
    raw.map_or(Ok(SellerLabel::default()), str::parse)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
