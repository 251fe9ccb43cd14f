//! Session Entity
//!
//! The (token, role) pair of an authenticated visitor. Both halves live in
//! one value, so a half-authenticated state is unrepresentable.

use crate::domain::value_object::{access_token::AccessToken, user_role::UserRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: AccessToken,
    pub role: UserRole,
}

impl Session {
    pub fn new(token: AccessToken, role: UserRole) -> Self {
        Self { token, role }
    }
}
