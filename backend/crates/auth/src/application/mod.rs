//! Application Layer
//!
//! Per-client session stores, route gate and the login / logout / signup
//! flows.

pub mod config;
pub mod guard;
pub mod login;
pub mod logout;
pub mod session_registry;
pub mod session_store;
pub mod sign_up;

// Re-exports
pub use config::AuthConfig;
pub use guard::{GuardDecision, LoginReason, decide};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use session_registry::{ClientStore, SessionRegistry};
pub use session_store::{LoginTicket, SessionStore};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
