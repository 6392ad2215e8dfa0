//! Persisted session medium.
//!
//! The session state machine stays pure; everything that outlives the process
//! (the auth cookie and the session snapshot) goes through the
//! [`SessionMedium`] trait. Browser shells implement it over
//! `document.cookie` / localStorage; tests and desktop shells use
//! [`MemoryMedium`].

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Cookie key holding the encoded auth token.
pub const AUTH_COOKIE_NAME: &str = "largify_auth_token";

/// Storage key holding the serialized [`SessionSnapshot`].
pub const SNAPSHOT_KEY: &str = "largify_session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

/// A write to the auth-token cookie.
///
/// Always root-path and lax same-site; max-age mirrors the token's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCookie {
    pub name: &'static str,
    pub value: String,
    pub max_age_secs: i64,
    pub path: &'static str,
    pub same_site: SameSite,
}

impl TokenCookie {
    /// Cookie carrying `token` for `max_age_secs` seconds.
    pub fn bearing(token: String, max_age_secs: i64) -> Self {
        Self {
            name: AUTH_COOKIE_NAME,
            value: token,
            max_age_secs,
            path: "/",
            same_site: SameSite::Lax,
        }
    }

    /// Max-age 0: instructs the medium to drop the cookie.
    pub fn clearing() -> Self {
        Self::bearing(String::new(), 0)
    }

    pub fn is_clearing(&self) -> bool {
        self.max_age_secs <= 0
    }
}

/// What survives a reload: user, token and the authenticated flag.
///
/// `is_loading` and `initialized` are per-process surface state and are never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user: User,
    pub token: String,
    pub is_authenticated: bool,
}

/// Side-effect boundary for session persistence.
///
/// Written only by `login` (bearing) and `logout` (clearing); there are no
/// concurrent writers.
pub trait SessionMedium: Send + Sync {
    fn write_cookie(&self, cookie: TokenCookie);

    /// The token held by the auth cookie, if any.
    fn read_token(&self) -> Option<String>;

    fn write_snapshot(&self, snapshot: &SessionSnapshot);

    fn read_snapshot(&self) -> Option<SessionSnapshot>;

    fn clear_snapshot(&self);
}

#[derive(Default)]
struct MemoryInner {
    cookie: Option<TokenCookie>,
    // Serialized key-value entries, like the localStorage they stand in for.
    storage: HashMap<String, String>,
}

/// In-process [`SessionMedium`] for tests and desktop shells.
#[derive(Default)]
pub struct MemoryMedium {
    inner: Mutex<MemoryInner>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionMedium for MemoryMedium {
    fn write_cookie(&self, cookie: TokenCookie) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.cookie = if cookie.is_clearing() {
                None
            } else {
                Some(cookie)
            };
        }
    }

    fn read_token(&self) -> Option<String> {
        self.inner
            .lock()
            .ok()?
            .cookie
            .as_ref()
            .map(|c| c.value.clone())
    }

    fn write_snapshot(&self, snapshot: &SessionSnapshot) {
        if let Ok(serialized) = serde_json::to_string(snapshot)
            && let Ok(mut inner) = self.inner.lock()
        {
            inner.storage.insert(SNAPSHOT_KEY.to_string(), serialized);
        }
    }

    fn read_snapshot(&self) -> Option<SessionSnapshot> {
        let inner = self.inner.lock().ok()?;
        let raw = inner.storage.get(SNAPSHOT_KEY)?;
        serde_json::from_str(raw).ok()
    }

    fn clear_snapshot(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.storage.remove(SNAPSHOT_KEY);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use largify_core::UserId;

    use super::*;
    use crate::roles::Role;

    fn snapshot() -> SessionSnapshot {
        let now = Utc::now();
        SessionSnapshot {
            user: User {
                id: UserId::new(),
                email: "pat@largify.com".to_string(),
                first_name: "Pat".to_string(),
                last_name: "Lee".to_string(),
                role: Role::Employee,
                department: "Operations".to_string(),
                is_active: true,
                last_login: Some(now),
                created_at: now,
                updated_at: now,
            },
            token: "header.payload.sig".to_string(),
            is_authenticated: true,
        }
    }

    #[test]
    fn clearing_cookie_drops_the_stored_token() {
        let medium = MemoryMedium::new();
        medium.write_cookie(TokenCookie::bearing("tok".to_string(), 3600));
        assert_eq!(medium.read_token().as_deref(), Some("tok"));

        medium.write_cookie(TokenCookie::clearing());
        assert_eq!(medium.read_token(), None);
    }

    #[test]
    fn snapshot_round_trips_through_serialization() {
        let medium = MemoryMedium::new();
        let snap = snapshot();
        medium.write_snapshot(&snap);
        assert_eq!(medium.read_snapshot(), Some(snap));

        medium.clear_snapshot();
        assert_eq!(medium.read_snapshot(), None);
    }

    #[test]
    fn cookie_defaults_are_root_and_lax() {
        let cookie = TokenCookie::bearing("tok".to_string(), 60);
        assert_eq!(cookie.name, AUTH_COOKIE_NAME);
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.same_site, SameSite::Lax);
        assert!(!cookie.is_clearing());
        assert!(TokenCookie::clearing().is_clearing());
    }
}
