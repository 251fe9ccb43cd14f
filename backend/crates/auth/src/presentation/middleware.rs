//! Gate Middleware
//!
//! Wraps every guarded section. Reads a fresh snapshot of the caller's
//! session (found through the session cookie) per request, asks the gate,
//! and either forwards the request with a [`GrantedSection`] extension or
//! answers with a redirect. No valid cookie means no session.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use platform::storage::KeyValueStorage;

use crate::application::guard::{GuardDecision, decide};
use crate::domain::gateway::LoginGateway;
use crate::domain::value_object::user_role::UserRole;
use crate::presentation::handlers::{AuthAppState, client_id};

/// Proof, stored in request extensions, that the gate rendered this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantedSection {
    pub role: UserRole,
}

/// Require the session role to own the section.
pub async fn require_role<S, G>(
    state: AuthAppState<S, G>,
    owner: UserRole,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    let id = client_id(req.headers(), &state.config);
    let session = state.registry.snapshot(id.as_ref()).await;
    let decision = decide(session.as_ref(), Some(owner), &state.table);
    let path = req.uri().path().to_owned();

    match decision {
        GuardDecision::Render { role } => {
            req.extensions_mut().insert(GrantedSection { role });
            next.run(req).await
        }
        GuardDecision::RedirectToLogin { reason } => {
            tracing::debug!(%path, %owner, %reason, "Gate redirecting to login");
            Redirect::to(&state.config.login_path).into_response()
        }
        GuardDecision::RedirectToHome { role, path: home } => {
            tracing::debug!(%path, %owner, %role, home, "Gate redirecting to role home");
            Redirect::to(home).into_response()
        }
    }
}
