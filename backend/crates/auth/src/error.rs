//! Auth Error Types
//!
//! Auth-specific error variants that render through the unified
//! `kernel::error::AppError` problem-details response.
//!
//! Guard outcomes (no session, wrong role, unmapped role) are not errors:
//! they are [`crate::application::guard::GuardDecision`] values that always
//! end in a redirect.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::ClientError;
use platform::storage::StorageError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Role code outside the closed enumeration
    #[error("Invalid user type: {0}")]
    InvalidRole(String),

    /// Empty or whitespace-only access token
    #[error("Invalid access token")]
    InvalidToken,

    /// A newer login attempt or a logout happened while this one was in flight
    #[error("Login attempt was superseded")]
    LoginSuperseded,

    /// Backend answered 2xx but without a usable token / user type
    #[error("Invalid login response from server")]
    MalformedLoginResponse,

    /// Request field failed validation
    #[error("{0}")]
    InvalidInput(String),

    /// Backend answered with a non-success status
    #[error("{message}")]
    BackendRejected { status: u16, message: String },

    /// Backend unreachable or answered garbage
    #[error("Network error occurred")]
    Backend(#[source] ClientError),

    /// Persistent session storage failed
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidRole(_) => ErrorKind::UnprocessableEntity,
            AuthError::InvalidToken | AuthError::InvalidInput(_) => ErrorKind::BadRequest,
            AuthError::LoginSuperseded => ErrorKind::Conflict,
            AuthError::MalformedLoginResponse | AuthError::Backend(_) => ErrorKind::BadGateway,
            AuthError::BackendRejected { status, .. } => match status {
                400 => ErrorKind::BadRequest,
                401 => ErrorKind::Unauthorized,
                403 => ErrorKind::Forbidden,
                409 => ErrorKind::Conflict,
                422 => ErrorKind::UnprocessableEntity,
                _ => ErrorKind::BadGateway,
            },
            AuthError::Storage(_) => ErrorKind::ServiceUnavailable,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::Backend(_) | AuthError::MalformedLoginResponse => {
                err.with_action("Please try again in a moment")
            }
            AuthError::LoginSuperseded => err.with_action("Sign in again"),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            AuthError::Backend(e) => {
                tracing::error!(error = %e, "Backend call failed");
            }
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Session storage failure");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::MalformedLoginResponse => {
                tracing::warn!("Backend login response missing token or user type");
            }
            AuthError::InvalidRole(code) => {
                tracing::warn!(user_type = %code, "Rejected unknown user type");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
