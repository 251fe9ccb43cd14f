//! Value Object Module

pub mod access_token;
pub mod email;
pub mod session_id;
pub mod user_role;
