//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and the gate middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{GrantedSection, require_role};
pub use router::{auth_api_router, portal_router, portal_router_generic};
