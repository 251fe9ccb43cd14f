//! Login Grant
//!
//! Strictly validated result of a backend login call.

use crate::domain::entity::session::Session;
use crate::domain::value_object::{access_token::AccessToken, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: AccessToken,
    pub role: UserRole,
}

impl LoginGrant {
    /// Validate the raw `access` / `user_type` fields of a login response.
    ///
    /// Missing or blank fields are a malformed response; a present but
    /// unknown user type is `InvalidRole`.
    pub fn from_wire(access: Option<String>, user_type: Option<String>) -> AuthResult<Self> {
        let access = access
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::MalformedLoginResponse)?;
        let user_type = user_type
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::MalformedLoginResponse)?;

        let role = UserRole::from_code(&user_type)?;
        let token = AccessToken::new(access)?;

        Ok(Self { token, role })
    }
}

impl From<LoginGrant> for Session {
    fn from(grant: LoginGrant) -> Self {
        Session::new(grant.token, grant.role)
    }
}
