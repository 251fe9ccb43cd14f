//! Login Use Case
//!
//! Exchanges credentials for a session and picks the redirect target.
//! The store write completes before the target is returned, so the
//! caller can never redirect ahead of the session it depends on.

use std::sync::Arc;

use platform::storage::KeyValueStorage;

use crate::application::config::AuthConfig;
use crate::application::session_store::{SessionStore, run_blocking};
use crate::domain::gateway::{Credentials, LoginGateway};
use crate::domain::route_table::RouteTable;
use crate::domain::value_object::{email::Email, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub role: UserRole,
    /// Role home, or the login page when the role has no table entry
    pub redirect_to: String,
}

pub struct LoginUseCase<S, G>
where
    S: KeyValueStorage + 'static,
    G: LoginGateway,
{
    store: Arc<SessionStore<S>>,
    gateway: Arc<G>,
    table: Arc<RouteTable>,
    config: Arc<AuthConfig>,
}

impl<S, G> LoginUseCase<S, G>
where
    S: KeyValueStorage + 'static,
    G: LoginGateway,
{
    pub fn new(
        store: Arc<SessionStore<S>>,
        gateway: Arc<G>,
        table: Arc<RouteTable>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            store,
            gateway,
            table,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let email = Email::new(&input.email)?;
        if input.password.is_empty() {
            return Err(AuthError::InvalidInput("Password cannot be empty".into()));
        }

        let ticket = self.store.begin_login();

        let credentials = Credentials {
            email,
            password: input.password,
        };
        let grant = self.gateway.sign_in(&credentials).await?;
        let role = grant.role;

        let store = Arc::clone(&self.store);
        run_blocking(move || store.commit_login(ticket, grant.into())).await?;

        let redirect_to = match self.table.home_path(role) {
            Some(path) => path.to_string(),
            None => {
                tracing::warn!(role = %role, "Logged-in role has no home route");
                self.config.login_path.clone()
            }
        };

        tracing::info!(role = %role, redirect_to = %redirect_to, "User logged in");

        Ok(LoginOutput { role, redirect_to })
    }
}
