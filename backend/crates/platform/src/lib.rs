//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no knowledge of roles or sessions:
//! - Persistent key-value storage (the portal's "local storage")
//! - JSON REST client for the blood-bank backend
//! - Cookie building / parsing and random token generation

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod storage;
