//! Auth-session state for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`SessionContext`] is built at startup and cloned into every client
//! and front-end component that needs identity. It owns the persistent
//! [`store::SessionStore`] and a `watch` channel broadcasting the current
//! session, so there is a single source of truth without global state.
//!
//! TRADE-OFFS
//! ==========
//! Subscribers see the latest value, not every intermediate one: two writes
//! in quick succession may be observed as one change.

pub mod store;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::watch;

use crate::config::SellerLabel;
use crate::redirect;
use store::{FileStorage, MemoryStorage, SessionStorage, SessionStore, StorageError};

// =============================================================================
// SESSION
// =============================================================================

/// Authenticated identity returned by login/register and cached locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Raw role string as sent by the backend; see [`Session::role_kind`].
    #[serde(default)]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_profile_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

impl Session {
    #[must_use]
    pub fn role_kind(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

pub(crate) fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Account roles known to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Client,
    /// Selling account, named `SELLER` or `FREELANCER` depending on backend.
    Seller,
}

impl Role {
    /// Case-insensitive parse; both seller spellings map to [`Role::Seller`].
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Self::Admin),
            "CLIENT" => Some(Self::Client),
            "SELLER" | "FREELANCER" => Some(Self::Seller),
            _ => None,
        }
    }

    #[must_use]
    pub fn wire_name(self, seller: SellerLabel) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Client => "CLIENT",
            Self::Seller => seller.as_str(),
        }
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Shared handle to the current session. Cheap to clone.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    store: Mutex<SessionStore>,
    tx: watch::Sender<Option<Session>>,
    seller_label: SellerLabel,
}

impl SessionContext {
    /// Load the stored session once and start broadcasting it.
    #[must_use]
    pub fn load(storage: Box<dyn SessionStorage>, seller_label: SellerLabel) -> Self {
        let store = SessionStore::new(storage);
        let initial = store.load_user();
        if let Some(session) = &initial {
            tracing::debug!(email = %session.email, role = %session.role, "restored stored session");
        }
        let (tx, _rx) = watch::channel(initial);
        Self { inner: Arc::new(Inner { store: Mutex::new(store), tx, seller_label }) }
    }

    #[must_use]
    pub fn open_file(path: impl Into<PathBuf>, seller_label: SellerLabel) -> Self {
        Self::load(Box::new(FileStorage::open(path)), seller_label)
    }

    /// Context backed by process memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStorage::new()), SellerLabel::default())
    }

    #[must_use]
    pub fn seller_label(&self) -> SellerLabel {
        self.inner.seller_label
    }

    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.inner.tx.borrow().clone()
    }

    /// Receive every subsequent change. Drop the handle to unsubscribe.
    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription { rx: self.inner.tx.subscribe() }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.tx.receiver_count()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock_store().token()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        // Release the watch borrow before taking the store lock.
        let has_user = self.inner.tx.borrow().is_some();
        has_user && self.token().is_some()
    }

    #[must_use]
    pub fn user_role(&self) -> Option<String> {
        self.inner
            .tx
            .borrow()
            .as_ref()
            .map(|s| s.role.clone())
    }

    /// Exact match against the stored role string.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.user_role().is_some_and(|r| r == role)
    }

    #[must_use]
    pub fn is_profile_completed(&self) -> bool {
        self.inner
            .tx
            .borrow()
            .as_ref()
            .is_some_and(|s| s.is_profile_completed)
    }

    /// Where the backend told us to go, or the role dashboard, or `/login`.
    #[must_use]
    pub fn redirect_path(&self) -> String {
        match self.inner.tx.borrow().as_ref() {
            Some(session) => session
                .redirect_to
                .clone()
                .filter(|p| !p.is_empty())
                .filter(|p| !(session.is_profile_completed && p == redirect::COMPLETE_PROFILE_PATH))
                .unwrap_or_else(|| redirect::post_login_path(session, self.inner.seller_label).to_owned()),
            None => redirect::LOGIN_PATH.to_owned(),
        }
    }

    /// Persist `session` and broadcast it, holding the store lock throughout.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written; nothing is broadcast.
    pub fn write_through(&self, session: Session) -> Result<(), StorageError> {
        let mut store = self.lock_store();
        store.save(&session)?;
        self.inner.tx.send_replace(Some(session));
        Ok(())
    }

    /// Drop the session from the store and the broadcast. Never fails.
    pub fn clear(&self) {
        let mut store = self.lock_store();
        if let Err(e) = store.clear() {
            tracing::warn!(error = %e, "failed to remove persisted session");
        }
        self.inner.tx.send_if_modified(|current| current.take().is_some());
    }

    /// Flag the cached session's profile as completed after a successful
    /// profile completion and drop the backend's stale `redirectTo`.
    /// Returns `false` when no session is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn mark_profile_completed(&self) -> Result<bool, StorageError> {
        let Some(mut session) = self.current() else {
            return Ok(false);
        };
        session.is_profile_completed = true;
        session.redirect_to = None;
        self.write_through(session)?;
        Ok(true)
    }

    fn lock_store(&self) -> MutexGuard<'_, SessionStore> {
        self.inner
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Change feed for a [`SessionContext`].
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionSubscription {
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    /// Wait for the next change and return the new value.
    /// Returns `None` once every [`SessionContext`] clone is gone.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    pub fn unsubscribe(self) {}
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
