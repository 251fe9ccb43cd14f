//! Portal Router
//!
//! Public pages, the legacy dashboard entry, one guarded sub-router per
//! route table section, and the `/api/auth` endpoints.

use axum::{
    Json, Router,
    body::Body,
    http::Request,
    middleware::{self as axum_middleware, Next},
    response::Redirect,
    routing::{MethodRouter, get, post},
};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::storage::KeyValueStorage;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_registry::SessionRegistry;
use crate::domain::gateway::LoginGateway;
use crate::domain::route_table::{LEGACY_DASHBOARD_PATH, RouteTable};
use crate::domain::value_object::user_role::UserRole;
use crate::infra::backend::HttpLoginGateway;
use crate::presentation::dto::PageView;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_role;

/// Create the portal router backed by the blood-bank REST API
pub fn portal_router<S>(
    registry: Arc<SessionRegistry<S>>,
    gateway: HttpLoginGateway,
    table: RouteTable,
    config: AuthConfig,
) -> Router
where
    S: KeyValueStorage + Clone + 'static,
{
    portal_router_generic(registry, gateway, table, config)
}

/// Create the portal router for any gateway implementation
pub fn portal_router_generic<S, G>(
    registry: Arc<SessionRegistry<S>>,
    gateway: G,
    table: RouteTable,
    config: AuthConfig,
) -> Router
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    let state = AuthAppState {
        registry,
        gateway: Arc::new(gateway),
        table: Arc::new(table),
        config: Arc::new(config),
    };

    let config = state.config.clone();
    let public_home = config.public_home_path.clone();

    let mut router = Router::new()
        .route(&config.public_home_path, public_page("home", "Home", &config.public_home_path))
        .route("/about", public_page("about", "About Us", "/about"))
        .route("/contact", public_page("contact", "Contact Us", "/contact"))
        .route(&config.login_path, public_page("login", "Login", &config.login_path))
        .route(&config.signup_path, public_page("signup", "Sign Up", &config.signup_path))
        .route(LEGACY_DASHBOARD_PATH, get(handlers::legacy_dashboard::<S, G>))
        .with_state(state.clone())
        .nest("/api/auth", auth_api_router(state.clone()));

    for section in state.table.sections() {
        router = router.merge(section_router(state.clone(), section.role, section.home_path));
    }

    router.fallback(move || {
        let target = public_home.clone();
        async move { Redirect::to(&target) }
    })
}

/// The `/api/auth` endpoints
pub fn auth_api_router<S, G>(state: AuthAppState<S, G>) -> Router
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    Router::new()
        .route("/login", post(handlers::login::<S, G>))
        .route("/logout", post(handlers::logout::<S, G>))
        .route("/status", get(handlers::session_status::<S, G>))
        .route("/signup", post(handlers::sign_up::<S, G>))
        .fallback(|| async { AppError::new(ErrorKind::NotFound, "Endpoint not found") })
        .with_state(state)
}

/// Guarded routes for one role section.
fn section_router<S, G>(state: AuthAppState<S, G>, owner: UserRole, home_path: &'static str) -> Router
where
    S: KeyValueStorage + Clone + 'static,
    G: LoginGateway + Send + Sync + 'static,
{
    let guard_state = state.clone();

    Router::new()
        .route(home_path, get(handlers::section_page::<S, G>))
        .route(&format!("{home_path}/"), get(handlers::section_page::<S, G>))
        .route(&format!("{home_path}/{{*page}}"), get(handlers::section_page::<S, G>))
        .route_layer(axum_middleware::from_fn(move |req: Request<Body>, next: Next| {
            let state = guard_state.clone();
            async move { require_role(state, owner, req, next).await }
        }))
        .with_state(state)
}

fn public_page<T>(page: &'static str, title: &'static str, path: &str) -> MethodRouter<T>
where
    T: Clone + Send + Sync + 'static,
{
    let path = path.to_string();
    get(move || {
        let view = PageView::public(page, title, path.clone());
        async move { Json(view) }
    })
}
