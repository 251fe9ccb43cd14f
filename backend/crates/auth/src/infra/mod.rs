//! Infrastructure Layer
//!
//! Backend gateway over the REST API.

pub mod backend;

pub use backend::HttpLoginGateway;
