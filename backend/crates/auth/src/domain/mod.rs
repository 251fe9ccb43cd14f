//! Domain Layer
//!
//! Entities, value objects, the role → route table, and the backend port.

pub mod entity;
pub mod gateway;
pub mod route_table;
pub mod value_object;

// Re-exports
pub use entity::{login_grant::LoginGrant, session::Session};
pub use gateway::LoginGateway;
pub use route_table::{NavEntry, NavIcon, RoleSection, RouteTable, SectionPage};
pub use value_object::{
    access_token::AccessToken, email::Email, session_id::SessionId, user_role::UserRole,
};
