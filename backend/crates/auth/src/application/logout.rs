//! Logout Use Case

use std::sync::Arc;

use platform::storage::KeyValueStorage;

use crate::application::session_store::{SessionStore, run_blocking};
use crate::error::AuthResult;

pub struct LogoutUseCase<S>
where
    S: KeyValueStorage,
{
    store: Arc<SessionStore<S>>,
}

impl<S> LogoutUseCase<S>
where
    S: KeyValueStorage + 'static,
{
    pub fn new(store: Arc<SessionStore<S>>) -> Self {
        Self { store }
    }

    /// Clear the session. The storage write runs on the blocking pool.
    pub async fn execute(&self) -> AuthResult<()> {
        let store = Arc::clone(&self.store);
        run_blocking(move || {
            store.logout();
            Ok(())
        })
        .await
    }
}
