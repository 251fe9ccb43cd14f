//! Auth (Portal Session) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Roles, session entities, route table, backend port
//! - `application/` - Per-client session stores, route gate, login / logout / signup flows
//! - `infra/` - Blood-bank REST gateway
//! - `presentation/` - HTTP handlers, DTOs, router, gate middleware
//!
//! ## Features
//! - Email + password login against the blood-bank backend
//! - One session (token + user type) per browser client, keyed by an
//!   opaque session-id cookie and persisted across restarts
//! - Role-scoped dashboard sections with redirect-to-home on mismatch
//! - Customer self-registration
//!
//! ## Session Model
//! - Token and user type are always written and cleared together
//! - Only the most recent login attempt may establish a session
//! - Every guarded navigation reads a fresh snapshot of the caller's session
//! - A request without a valid session cookie is unauthenticated

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_registry::SessionRegistry;
pub use application::session_store::SessionStore;
pub use domain::route_table::RouteTable;
pub use error::{AuthError, AuthResult};
pub use infra::backend::HttpLoginGateway;
pub use presentation::router::portal_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
