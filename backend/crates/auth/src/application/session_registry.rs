//! Session Registry
//!
//! One [`SessionStore`] per browser client, keyed by the id in the session
//! cookie. Every store keeps its own session and login generation, and
//! persists under its own namespace of the shared storage.
//!
//! Only authenticated clients are registered. A cookie naming an id that
//! is neither registered nor restorable from storage resolves to nothing,
//! so forged or expired ids never create entries.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use platform::storage::{KeyValueStorage, Namespaced};
use tokio::sync::Mutex;

use crate::application::config::AuthConfig;
use crate::application::session_store::{SessionStore, run_blocking};
use crate::domain::entity::session::Session;
use crate::domain::value_object::session_id::SessionId;
use crate::error::AuthResult;

/// Store of a single client.
pub type ClientStore<S> = SessionStore<Namespaced<S>>;

pub struct SessionRegistry<S>
where
    S: KeyValueStorage + Clone,
{
    storage: S,
    config: AuthConfig,
    clients: RwLock<HashMap<SessionId, Arc<ClientStore<S>>>>,
    /// Serializes restores from storage with `forget`, so a logged-out
    /// client cannot be restored from keys that are being cleared.
    loading: Mutex<()>,
}

impl<S> SessionRegistry<S>
where
    S: KeyValueStorage + Clone + 'static,
{
    pub fn new(storage: S, config: &AuthConfig) -> Self {
        Self {
            storage,
            config: config.clone(),
            clients: RwLock::new(HashMap::new()),
            loading: Mutex::new(()),
        }
    }

    /// Store of a registered client.
    ///
    /// Ids unknown to this process are restored from storage on first use
    /// (after a restart) and registered only if a session comes back.
    pub async fn find(&self, id: &SessionId) -> AuthResult<Option<Arc<ClientStore<S>>>> {
        if let Some(store) = self.read_clients().get(id) {
            return Ok(Some(Arc::clone(store)));
        }

        let _loading = self.loading.lock().await;
        if let Some(store) = self.read_clients().get(id) {
            return Ok(Some(Arc::clone(store)));
        }

        let storage = self.namespace(id);
        let config = self.config.clone();
        let store = run_blocking(move || SessionStore::open(storage, &config)).await?;
        if !store.is_authenticated() {
            return Ok(None);
        }

        tracing::debug!(role = ?store.role(), "Restored client session");
        let store = Arc::new(store);
        self.write_clients().insert(id.clone(), Arc::clone(&store));
        Ok(Some(store))
    }

    /// Fresh id with a logged-out store. Not registered until [`adopt`].
    ///
    /// [`adopt`]: SessionRegistry::adopt
    pub fn issue(&self) -> (SessionId, Arc<ClientStore<S>>) {
        let id = SessionId::generate();
        let store = Arc::new(SessionStore::new(self.namespace(&id), &self.config));
        (id, store)
    }

    /// Register a store obtained from [`issue`] once it holds a session.
    ///
    /// [`issue`]: SessionRegistry::issue
    pub fn adopt(&self, id: SessionId, store: Arc<ClientStore<S>>) {
        self.write_clients().insert(id, store);
    }

    /// Drop a client. Its store must already be logged out.
    pub async fn forget(&self, id: &SessionId) {
        let _loading = self.loading.lock().await;
        self.write_clients().remove(id);
    }

    /// Session of the client presenting `id`.
    ///
    /// No id, an unknown id and a storage failure all read as logged out.
    pub async fn snapshot(&self, id: Option<&SessionId>) -> Option<Session> {
        let id = id?;
        match self.find(id).await {
            Ok(store) => store.and_then(|store| store.snapshot()),
            Err(e) => {
                tracing::error!(error = %e, "Session lookup failed");
                None
            }
        }
    }

    fn namespace(&self, id: &SessionId) -> Namespaced<S> {
        Namespaced::new(self.storage.clone(), id.as_str())
    }

    fn read_clients(&self) -> RwLockReadGuard<'_, HashMap<SessionId, Arc<ClientStore<S>>>> {
        self.clients.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_clients(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, Arc<ClientStore<S>>>> {
        self.clients.write().unwrap_or_else(PoisonError::into_inner)
    }
}
