//! Backend Gateway Port
//!
//! The blood-bank backend is an external collaborator. The application
//! layer only sees this trait; `infra::backend` implements it over HTTP.

use std::fmt;

use crate::domain::entity::login_grant::LoginGrant;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

pub struct Credentials {
    pub email: Email,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// New customer account. The backend assigns the user type.
pub struct Registration {
    pub name: String,
    pub email: Email,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationReceipt {
    /// Backend-provided confirmation text
    pub message: Option<String>,
}

#[trait_variant::make(LoginGateway: Send)]
pub trait LocalLoginGateway {
    /// Exchange credentials for a validated token + role.
    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<LoginGrant>;

    /// Create a customer account.
    async fn register(&self, registration: &Registration) -> AuthResult<RegistrationReceipt>;
}
