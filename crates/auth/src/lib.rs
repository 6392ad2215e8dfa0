//! `largify-auth` — authentication, authorization and session core.
//!
//! This crate is intentionally decoupled from the UI shell and from any
//! storage backend. Dashboards, route tables and persistence adapters are
//! callers of the public interface exposed here:
//!
//! - [`token`] — signed session token codec (HS256, fail-closed decode)
//! - [`permissions`] — role → capability matrix, total and panic-free
//! - [`directory`] — user lookup behind the [`UserDirectory`] seam
//! - [`session`] — the login/logout/refresh state machine
//! - [`routes`] — landing-path resolution and route guards

pub mod directory;
pub mod permissions;
pub mod persist;
pub mod roles;
pub mod routes;
pub mod session;
pub mod token;
pub mod user;

pub use directory::{DEMO_PASSWORDS, SeedDirectory, UserDirectory};
pub use permissions::{
    Capability, DataScope, Module, PermissionSet, can_access, has_permission, permissions_for,
};
pub use persist::{
    AUTH_COOKIE_NAME, MemoryMedium, SNAPSHOT_KEY, SameSite, SessionMedium, SessionSnapshot,
    TokenCookie,
};
pub use roles::Role;
pub use routes::{DEFAULT_LANDING_PATH, LOGIN_PATH, landing_path_for, landing_path_for_name};
pub use session::{LoginError, LoginSuccess, Navigator, SessionState, SessionStore};
pub use token::{TokenClaims, TokenCodec, TokenError};
pub use user::{ProfileUpdate, User};
