//! Route Authorization Gate
//!
//! Pure decision function evaluated on every navigation into a guarded
//! section. It holds no state; callers pass a fresh session snapshot each
//! time, so a login or logout between navigations is always observed.

use derive_more::Display;

use crate::domain::entity::session::Session;
use crate::domain::route_table::RouteTable;
use crate::domain::value_object::user_role::UserRole;

/// Why a visitor is sent to the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LoginReason {
    #[display("unauthenticated")]
    Unauthenticated,
    /// Session role has no entry in the route table
    #[display("unmapped_role")]
    UnmappedRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested section inside the dashboard layout.
    Render { role: UserRole },
    RedirectToLogin { reason: LoginReason },
    /// Send the visitor to their own role's home.
    RedirectToHome { role: UserRole, path: &'static str },
}

impl GuardDecision {
    /// Redirect target, with `login_path` standing in for the login page.
    pub fn redirect_target<'a>(&self, login_path: &'a str) -> Option<&'a str> {
        match self {
            GuardDecision::Render { .. } => None,
            GuardDecision::RedirectToLogin { .. } => Some(login_path),
            GuardDecision::RedirectToHome { path, .. } => Some(*path),
        }
    }
}

/// Decide a navigation.
///
/// `owner` is the role owning the requested section. `None` is the legacy
/// dashboard entry point: any authenticated visitor is sent home.
pub fn decide(session: Option<&Session>, owner: Option<UserRole>, table: &RouteTable) -> GuardDecision {
    let Some(session) = session else {
        return GuardDecision::RedirectToLogin {
            reason: LoginReason::Unauthenticated,
        };
    };

    let role = session.role;
    if owner == Some(role) {
        return GuardDecision::Render { role };
    }

    match table.home_path(role) {
        Some(path) => GuardDecision::RedirectToHome { role, path },
        None => GuardDecision::RedirectToLogin {
            reason: LoginReason::UnmappedRole,
        },
    }
}
