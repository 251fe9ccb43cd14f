//! Session Store
//!
//! Source of truth for "is this client logged in, and as what role".
//! [`super::session_registry::SessionRegistry`] keeps one store per client.
//! The in-memory session is mirrored to two storage keys; both are written
//! or removed in one batch, and memory only changes after storage accepted
//! the change.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use derive_more::Display;
use platform::storage::KeyValueStorage;

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::value_object::{access_token::AccessToken, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Handle for one in-flight login. Only the most recent ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("login#{_0}")]
pub struct LoginTicket(u64);

#[derive(Debug, Default)]
struct StoreState {
    session: Option<Session>,
    /// Advanced by every login, logout and `begin_login`.
    generation: u64,
}

pub struct SessionStore<S>
where
    S: KeyValueStorage,
{
    storage: S,
    token_key: String,
    role_key: String,
    state: RwLock<StoreState>,
}

impl<S> SessionStore<S>
where
    S: KeyValueStorage,
{
    /// Logged-out store. Storage is not read.
    pub fn new(storage: S, config: &AuthConfig) -> Self {
        Self {
            storage,
            token_key: config.token_key.clone(),
            role_key: config.role_key.clone(),
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Restore the persisted session, if any.
    ///
    /// A lone key, a blank token or an unknown user type is discarded and
    /// both keys are cleared, so the store never starts half-authenticated.
    pub fn open(storage: S, config: &AuthConfig) -> AuthResult<Self> {
        let token = storage.get(&config.token_key)?;
        let role = storage.get(&config.role_key)?;

        let store = Self::new(storage, config);

        let restored = match (token, role) {
            (None, None) => None,
            (Some(token), Some(role)) => match restore(token, &role) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding invalid persisted session");
                    store.clear_storage()?;
                    None
                }
            },
            (token, role) => {
                tracing::warn!(
                    has_token = token.is_some(),
                    has_role = role.is_some(),
                    "Discarding half-persisted session"
                );
                store.clear_storage()?;
                None
            }
        };

        if let Some(session) = &restored {
            tracing::info!(role = %session.role, "Restored persisted session");
        }
        store.write_state().session = restored;

        Ok(store)
    }

    /// Log in with a raw token and user type code.
    ///
    /// The role is validated before anything is written; on any error the
    /// previous session stays in place.
    pub fn login(&self, token: impl Into<String>, role_code: &str) -> AuthResult<UserRole> {
        let role = UserRole::from_code(role_code)?;
        let token = AccessToken::new(token)?;
        self.establish(Session::new(token, role))?;
        Ok(role)
    }

    /// Replace the current session. Supersedes any in-flight login.
    fn establish(&self, session: Session) -> AuthResult<()> {
        let mut state = self.write_state();
        self.persist(&session)?;
        state.generation += 1;
        tracing::info!(role = %session.role, "Session established");
        state.session = Some(session);
        Ok(())
    }

    /// Start an asynchronous login. Invalidates older tickets.
    pub fn begin_login(&self) -> LoginTicket {
        let mut state = self.write_state();
        state.generation += 1;
        LoginTicket(state.generation)
    }

    /// Commit the result of the login started with `ticket`.
    ///
    /// Fails with `LoginSuperseded`, touching nothing, if a newer login
    /// started or a logout happened since `begin_login`.
    pub fn commit_login(&self, ticket: LoginTicket, session: Session) -> AuthResult<()> {
        let mut state = self.write_state();

        if state.generation != ticket.0 {
            tracing::warn!(%ticket, current = state.generation, "Dropping stale login response");
            return Err(AuthError::LoginSuperseded);
        }

        self.persist(&session)?;
        state.generation += 1;
        tracing::info!(role = %session.role, "Session established");
        state.session = Some(session);
        Ok(())
    }

    /// Clear the session. Idempotent.
    ///
    /// Memory is cleared even if storage fails, so a broken disk cannot
    /// keep a visitor logged in for the rest of the process.
    pub fn logout(&self) {
        let mut state = self.write_state();
        state.generation += 1;

        if let Err(e) = self.clear_storage() {
            tracing::error!(error = %e, "Failed to clear persisted session");
        }

        if let Some(previous) = state.session.take() {
            tracing::info!(role = %previous.role, "Session cleared");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().session.is_some()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.read_state().session.as_ref().map(|s| s.role)
    }

    /// Consistent copy of the current session.
    pub fn snapshot(&self) -> Option<Session> {
        self.read_state().session.clone()
    }

    fn persist(&self, session: &Session) -> AuthResult<()> {
        self.storage.set_all(&[
            (self.token_key.as_str(), session.token.expose()),
            (self.role_key.as_str(), session.role.code()),
        ])?;
        Ok(())
    }

    fn clear_storage(&self) -> AuthResult<()> {
        self.storage
            .remove_all(&[self.token_key.as_str(), self.role_key.as_str()])?;
        Ok(())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Run a storage-touching closure on the blocking pool.
///
/// Store writes hold the state lock across storage I/O, so async callers
/// must not run them on a runtime worker.
pub(crate) async fn run_blocking<T, F>(f: F) -> AuthResult<T>
where
    F: FnOnce() -> AuthResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(format!("Blocking session task failed: {e}")))?
}

fn restore(token: String, role: &str) -> AuthResult<Session> {
    let role = UserRole::from_code(role)?;
    let token = AccessToken::new(token)?;
    Ok(Session::new(token, role))
}
