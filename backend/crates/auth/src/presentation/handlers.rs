//! HTTP Handlers

use axum::extract::State;
use axum::http::{HeaderMap, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use std::sync::Arc;

use platform::storage::KeyValueStorage;

use crate::application::config::AuthConfig;
use crate::application::guard::decide;
use crate::application::session_registry::SessionRegistry;
use crate::application::{LoginInput, LoginUseCase, LogoutUseCase, SignUpInput, SignUpUseCase};
use crate::domain::gateway::LoginGateway;
use crate::domain::route_table::RouteTable;
use crate::domain::value_object::session_id::SessionId;
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, LoginResponse, LogoutResponse, PageView, SessionStatusResponse, SignUpRequest,
    SignUpResponse,
};
use crate::presentation::middleware::GrantedSection;

/// Shared state for portal handlers
pub struct AuthAppState<S, G>
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    pub registry: Arc<SessionRegistry<S>>,
    pub gateway: Arc<G>,
    pub table: Arc<RouteTable>,
    pub config: Arc<AuthConfig>,
}

// Manual impl: derive would demand `G: Clone`.
impl<S, G> Clone for AuthAppState<S, G>
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            gateway: self.gateway.clone(),
            table: self.table.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
///
/// A client whose cookie names a registered session logs in on that
/// session, so its older in-flight logins are superseded. Anyone else gets
/// a fresh session id, registered only once the login succeeds.
pub async fn login<S, G>(
    State(state): State<AuthAppState<S, G>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    let known = match client_id(&headers, &state.config) {
        Some(id) => {
            let store = state.registry.find(&id).await?;
            store.map(|store| (id, store))
        }
        None => None,
    };
    let (id, store, fresh) = match known {
        Some((id, store)) => (id, store, false),
        None => {
            let (id, store) = state.registry.issue();
            (id, store, true)
        }
    };

    let use_case = LoginUseCase::new(
        store.clone(),
        state.gateway.clone(),
        state.table.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    if fresh {
        state.registry.adopt(id.clone(), store);
    }

    let cookie = state.config.session_cookie().build_set_cookie(id.as_str());

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            role: output.role,
            redirect_to: output.redirect_to,
        }),
    )
        .into_response())
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
///
/// Ends the caller's session, if any, and always expires the cookie.
pub async fn logout<S, G>(
    State(state): State<AuthAppState<S, G>>,
    headers: HeaderMap,
) -> Response
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    if let Some(id) = client_id(&headers, &state.config) {
        match state.registry.find(&id).await {
            Ok(Some(store)) => {
                let use_case = LogoutUseCase::new(store);
                if let Err(e) = use_case.execute().await {
                    tracing::error!(error = %e, "Logout failed");
                }
                state.registry.forget(&id).await;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, "Session lookup failed during logout");
            }
        }
    }

    let cookie = state.config.session_cookie().build_delete_cookie();

    (
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse {
            redirect_to: state.config.login_path.clone(),
        }),
    )
        .into_response()
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
pub async fn session_status<S, G>(
    State(state): State<AuthAppState<S, G>>,
    headers: HeaderMap,
) -> Json<SessionStatusResponse>
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    let id = client_id(&headers, &state.config);
    let role = state.registry.snapshot(id.as_ref()).await.map(|s| s.role);
    Json(SessionStatusResponse {
        authenticated: role.is_some(),
        role,
        home_path: role
            .and_then(|r| state.table.home_path(r))
            .map(str::to_string),
    })
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<S, G>(
    State(state): State<AuthAppState<S, G>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<Json<SignUpResponse>>
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.gateway.clone());

    let output = use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(SignUpResponse {
        message: output.message,
    }))
}

// ============================================================================
// Pages
// ============================================================================

/// GET /dashboard
///
/// Sends authenticated visitors to their role home, everyone else to login.
pub async fn legacy_dashboard<S, G>(
    State(state): State<AuthAppState<S, G>>,
    headers: HeaderMap,
) -> Redirect
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    let id = client_id(&headers, &state.config);
    let session = state.registry.snapshot(id.as_ref()).await;
    let decision = decide(session.as_ref(), None, &state.table);
    let login_path = state.config.login_path.as_str();
    let redirect_to = decision.redirect_target(login_path).unwrap_or(login_path);

    tracing::debug!(redirect_to, "Legacy dashboard redirect");
    Redirect::to(redirect_to)
}

/// GET `<home>`, `<home>/` and `<home>/<page>` behind the gate.
///
/// Pages the section does not know fall back to the section home.
pub async fn section_page<S, G>(
    State(state): State<AuthAppState<S, G>>,
    Extension(granted): Extension<GrantedSection>,
    uri: Uri,
) -> Response
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    let Some(section) = state.table.section(granted.role) else {
        return Redirect::to(&state.config.login_path).into_response();
    };

    let path = uri.path();
    let sub_path = path.strip_prefix(section.home_path).unwrap_or_default();

    match section.page(sub_path) {
        Some(page) => Json(PageView::dashboard(section, page, path)).into_response(),
        None => {
            tracing::debug!(path, home = section.home_path, "Unknown section page");
            Redirect::to(section.home_path).into_response()
        }
    }
}

/// Session id from the request's cookie. Malformed values count as absent.
pub(crate) fn client_id(headers: &HeaderMap, config: &AuthConfig) -> Option<SessionId> {
    platform::cookie::extract_cookie(headers, &config.session_cookie_name)
        .and_then(|value| SessionId::parse(&value))
}
