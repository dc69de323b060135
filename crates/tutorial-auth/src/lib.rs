//! Tutorial Auth
//!
//! Session-based access control for editing tutorials. Mutating operations
//! require a logged-in user; reads are open.
//!
//! The gate is built from two injected services:
//! - a [`CredentialStore`] that checks usernames and passwords
//! - a [`SessionStore`] that maps session ids to users, with a TTL
//!
//! How the session id travels (cookie, header) is up to the caller.

mod credentials;
mod error;
mod gate;
mod session;

pub use credentials::{CredentialStore, SqliteCredentialStore, User};
pub use error::AuthError;
pub use gate::{AccessGate, CurrentUser};
pub use session::{
  DEFAULT_SESSION_TTL_SECS, InMemorySessionStore, MAX_SESSION_TTL_SECS, Session, SessionStore,
};
