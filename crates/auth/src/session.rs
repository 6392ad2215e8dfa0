//! Session state machine.
//!
//! One [`SessionStore`] per client process. The store is an injectable
//! service (constructed with its collaborators, never a module-level global)
//! so the state machine can be driven in isolation. State transitions
//! themselves are pure methods on [`SessionState`]; persistence and
//! navigation are explicit side effects applied by the store around them.
//!
//! `login` and `refresh` suspend at the directory seam. There is no true
//! parallelism to coordinate — a tokio mutex serializes the writes and a
//! generation counter keeps an in-flight `login` from resurrecting a session
//! after an explicit `logout`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::directory::UserDirectory;
use crate::persist::{SessionMedium, SessionSnapshot, TokenCookie};
use crate::routes::{self, LOGIN_PATH};
use crate::token::TokenCodec;
use crate::user::{ProfileUpdate, User};

/// Navigation hook for auth transitions (logout sends the client to the
/// login entry point). UI shells implement this; headless callers omit it.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// The session surface UI layers read.
///
/// Lifecycle: all-false on first load → `login` populates everything →
/// `refresh` reconstructs from the persisted token (setting `initialized`
/// regardless of outcome) → `logout` returns to the empty state with
/// `initialized` still true. Callers gate role-dependent rendering on
/// `initialized`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub initialized: bool,
}

impl SessionState {
    fn begin_loading(&mut self) {
        self.is_loading = true;
    }

    /// Settle with no session. `initialized` becomes true: an absent or
    /// rejected session is a settled outcome, not a pending one.
    fn settle_unauthenticated(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
        self.is_loading = false;
        self.initialized = true;
    }

    fn settle_authenticated(&mut self, user: User, token: String) {
        self.user = Some(user);
        self.token = Some(token);
        self.is_authenticated = true;
        self.is_loading = false;
        self.initialized = true;
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Deliberately generic: never reveals whether the email or the password
    /// was wrong.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Token issuance failed; the session stays unauthenticated.
    #[error("could not issue a session token")]
    TokenIssuance,

    /// A logout raced this attempt; its result was discarded and the
    /// logged-out state kept.
    #[error("login superseded by logout")]
    Superseded,
}

/// Outcome of a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub user: User,
    /// Where the login entry point should send the client: the explicit
    /// redirect parameter when given and safe, else the role's landing path.
    pub redirect_to: String,
}

/// Process-wide authentication state and its operations.
pub struct SessionStore {
    directory: Arc<dyn UserDirectory>,
    codec: TokenCodec,
    medium: Arc<dyn SessionMedium>,
    navigator: Option<Arc<dyn Navigator>>,
    state: Mutex<SessionState>,
    // Bumped by logout; in-flight logins re-check it before committing.
    epoch: AtomicU64,
}

impl SessionStore {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        codec: TokenCodec,
        medium: Arc<dyn SessionMedium>,
    ) -> Self {
        Self {
            directory,
            codec,
            medium,
            navigator: None,
            state: Mutex::new(SessionState::default()),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Snapshot of the current surface state.
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.lock().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.is_authenticated
    }

    /// Authenticate against the directory and establish a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess, LoginError> {
        self.login_with_redirect(email, password, None).await
    }

    /// [`login`](Self::login) honoring an explicit `redirect` query
    /// parameter from the login entry point.
    pub async fn login_with_redirect(
        &self,
        email: &str,
        password: &str,
        redirect: Option<&str>,
    ) -> Result<LoginSuccess, LoginError> {
        let attempt = self.epoch.load(Ordering::SeqCst);
        self.state.lock().await.begin_loading();

        let found = self.directory.find_by_credentials(email, password).await;

        let mut state = self.state.lock().await;
        if self.epoch.load(Ordering::SeqCst) != attempt {
            // A logout landed while the lookup was in flight; its state wins.
            state.is_loading = false;
            return Err(LoginError::Superseded);
        }

        let Some(mut user) = found else {
            warn!(email, "login rejected");
            state.settle_unauthenticated();
            return Err(LoginError::InvalidCredentials);
        };

        let now = Utc::now();
        user.last_login = Some(now);

        let token = match self.codec.encode(&user, now) {
            Ok(token) => token,
            Err(err) => {
                warn!(%err, "token issuance failed");
                state.settle_unauthenticated();
                return Err(LoginError::TokenIssuance);
            }
        };

        state.settle_authenticated(user.clone(), token.clone());

        // Persist while still holding the state lock so a logout cannot
        // interleave between the commit and the medium writes.
        self.medium.write_cookie(TokenCookie::bearing(
            token.clone(),
            self.codec.ttl().num_seconds(),
        ));
        self.medium.write_snapshot(&SessionSnapshot {
            user: user.clone(),
            token,
            is_authenticated: true,
        });
        drop(state);

        info!(user_id = %user.id, role = user.role.as_str(), "login succeeded");
        let redirect_to = routes::resolve_redirect(&user, redirect);
        Ok(LoginSuccess { user, redirect_to })
    }

    /// Tear down the session.
    ///
    /// Unconditional and idempotent. Side effects, in order: bump the epoch
    /// (so in-flight logins discard their results), clear the auth cookie
    /// (max-age 0) and the persisted snapshot, reset in-memory state
    /// (`initialized` stays true), then navigate to the login entry point.
    pub async fn logout(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.medium.write_cookie(TokenCookie::clearing());
        self.medium.clear_snapshot();

        self.state.lock().await.settle_unauthenticated();
        info!("logged out");

        if let Some(navigator) = &self.navigator {
            navigator.navigate(LOGIN_PATH);
        }
    }

    /// Load the persisted snapshot into memory without validating it.
    ///
    /// Mirrors the rehydration step that runs before [`refresh`](Self::refresh)
    /// on app start; `refresh` then confirms the session or tears it down.
    pub async fn rehydrate(&self) {
        let Some(snapshot) = self.medium.read_snapshot() else {
            return;
        };
        let mut state = self.state.lock().await;
        if state.initialized || state.is_authenticated {
            return;
        }
        state.user = Some(snapshot.user);
        state.token = Some(snapshot.token);
        state.is_authenticated = snapshot.is_authenticated;
    }

    /// Reconstruct the session from the persisted token, once at app start.
    ///
    /// Always leaves `initialized` true. An absent token is not an error —
    /// the session simply settles unauthenticated. An invalid token or a
    /// token whose subject no longer resolves is recovered by
    /// [`logout`](Self::logout) — a silent re-prompt to log in, never a
    /// user-facing failure.
    ///
    /// Callers must await completion before rendering role-gated UI.
    pub async fn refresh(&self) {
        let attempt = self.epoch.load(Ordering::SeqCst);
        let in_memory = {
            let mut state = self.state.lock().await;
            state.begin_loading();
            state.token.clone()
        };

        // Recover from the snapshot first, then the cookie.
        let token = in_memory
            .or_else(|| self.medium.read_snapshot().map(|s| s.token))
            .or_else(|| self.medium.read_token());

        let Some(token) = token else {
            self.state.lock().await.settle_unauthenticated();
            return;
        };

        let claims = match self.codec.decode(&token) {
            Ok(claims) => claims,
            Err(err) => {
                warn!(%err, "stored token rejected, clearing session");
                self.logout().await;
                return;
            }
        };

        match self.directory.find_by_id(claims.sub).await {
            Some(user) => {
                let mut state = self.state.lock().await;
                if self.epoch.load(Ordering::SeqCst) != attempt {
                    state.is_loading = false;
                    return;
                }
                info!(user_id = %user.id, role = user.role.as_str(), "session restored");
                state.settle_authenticated(user, token);
            }
            None => {
                warn!(subject = %claims.sub, "no active directory record for token subject");
                self.logout().await;
            }
        }
    }

    /// Merge a partial profile update into the current user.
    ///
    /// No-op while unauthenticated (idempotent guard, not an error). The
    /// persisted snapshot is rewritten so the change survives a reload.
    pub async fn update_profile(&self, update: &ProfileUpdate) {
        let mut state = self.state.lock().await;
        let Some(user) = state.user.as_mut() else {
            return;
        };
        user.apply(update, Utc::now());

        if let (Some(user), Some(token)) = (state.user.clone(), state.token.clone()) {
            self.medium.write_snapshot(&SessionSnapshot {
                user,
                token,
                is_authenticated: state.is_authenticated,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::SeedDirectory;
    use crate::persist::MemoryMedium;

    fn store() -> SessionStore {
        SessionStore::new(
            Arc::new(SeedDirectory::new()),
            TokenCodec::new(b"session-unit-test"),
            Arc::new(MemoryMedium::new()),
        )
    }

    #[tokio::test]
    async fn initial_state_is_empty_and_uninitialized() {
        let state = store().state().await;
        assert_eq!(state, SessionState::default());
    }

    #[tokio::test]
    async fn failed_login_settles_unauthenticated_but_initialized() {
        let store = store();
        let err = store.login("admin@largify.com", "wrong").await.unwrap_err();
        assert_eq!(err, LoginError::InvalidCredentials);

        let state = store.state().await;
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        assert!(state.initialized);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn login_populates_every_surface_field() {
        let store = store();
        let success = store.login("sales@largify.com", "demo123").await.unwrap();
        assert_eq!(success.redirect_to, "/dashboard/sales");
        assert!(success.user.last_login.is_some());

        let state = store.state().await;
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert!(state.initialized);
        assert_eq!(state.user.unwrap().id, success.user.id);
        assert!(state.token.is_some());
    }

    #[tokio::test]
    async fn logout_twice_equals_logout_once() {
        let store = store();
        store.login("employee@largify.com", "password").await.unwrap();

        store.logout().await;
        let once = store.state().await;
        store.logout().await;
        let twice = store.state().await;

        assert_eq!(once, twice);
        assert!(!once.is_authenticated);
        assert!(once.initialized);
    }

    #[tokio::test]
    async fn update_profile_without_session_is_a_noop() {
        let store = store();
        store
            .update_profile(&ProfileUpdate {
                first_name: Some("Ghost".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(store.state().await, SessionState::default());
    }

    #[tokio::test]
    async fn update_profile_merges_and_bumps_updated_at() {
        let store = store();
        let success = store.login("hr@largify.com", "password").await.unwrap();
        let before = success.user.updated_at;

        store
            .update_profile(&ProfileUpdate {
                last_name: Some("Olsen-Berg".to_string()),
                ..Default::default()
            })
            .await;

        let user = store.current_user().await.unwrap();
        assert_eq!(user.last_name, "Olsen-Berg");
        assert!(user.updated_at >= before);
    }

    #[tokio::test]
    async fn refresh_with_no_token_settles_initialized() {
        let store = store();
        store.refresh().await;

        let state = store.state().await;
        assert!(state.initialized);
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
    }
}
