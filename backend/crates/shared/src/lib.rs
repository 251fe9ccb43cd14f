//! Shared Kernel
//!
//! Vocabulary shared by every crate of the portal:
//! - The unified error type and its HTTP status classification
//! - Its problem-details HTTP rendering (feature `axum`)
//!
//! Only things whose meaning is the same in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
