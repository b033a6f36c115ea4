//! Account client for the marketplace backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Registration, login, password recovery and profile management for admin,
//! client and seller accounts. Front-ends (the `marketplace` binary, or any
//! embedding UI) own a [`session::SessionContext`] and hand it to the
//! [`auth::AuthClient`] and [`profile::ProfileClient`]; navigation decisions
//! come from [`redirect`].
//!
//! ARCHITECTURE
//! ============
//! - `session`: persisted token + user, broadcast to subscribers.
//! - `net`: request/response types and the `ApiTransport` seam over reqwest.
//! - `auth` / `profile`: thin REST clients; only auth writes the session.
//! - `validate` / `messages`: form guards and status-to-text mapping used by
//!   presentation code.

pub mod auth;
pub mod config;
pub mod messages;
pub mod net;
pub mod profile;
pub mod redirect;
pub mod session;
pub mod validate;

pub use auth::AuthClient;
pub use config::ClientConfig;
pub use net::error::ApiError;
pub use profile::ProfileClient;
pub use session::{Session, SessionContext};
