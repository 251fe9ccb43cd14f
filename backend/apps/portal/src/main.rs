//! Portal Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors go through
//! `auth::AuthError` and render as problem details.

use anyhow::Context;
use auth::{AuthConfig, HttpLoginGateway, RouteTable, SessionRegistry, portal_router};
use axum::http::{self, Method, header};
use platform::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "0.0.0.0:31114";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal=info,auth=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;

    // Session storage: file-backed when a path is configured
    let storage: Arc<dyn KeyValueStorage> = match env::var("SESSION_STORAGE_PATH") {
        Ok(path) if !path.trim().is_empty() => {
            let storage = FileStorage::open(&path)
                .with_context(|| format!("failed to open session storage at {path}"))?;
            tracing::info!(path = %storage.path().display(), "Using file session storage");
            Arc::new(storage)
        }
        _ => {
            tracing::warn!("SESSION_STORAGE_PATH not set, sessions will not survive restarts");
            Arc::new(MemoryStorage::new())
        }
    };

    // Client sessions are restored from storage on their first request
    let registry = Arc::new(SessionRegistry::new(storage, &config));

    let table = RouteTable::standard();
    let missing = table.missing_roles();
    if !missing.is_empty() {
        tracing::warn!(?missing, "Route table has roles without a home section");
    }

    let gateway = HttpLoginGateway::new(&config)?;
    tracing::info!(
        backend = %config.backend_api_url,
        timeout_secs = config.backend_timeout.as_secs(),
        "Backend gateway configured"
    );

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = portal_router(registry, gateway, table, config)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("PORTAL_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .context("PORTAL_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_config() -> anyhow::Result<AuthConfig> {
    let mut config = AuthConfig::default();

    if let Ok(url) = env::var("BACKEND_API_URL") {
        config.backend_api_url = url.trim_end_matches('/').to_string();
    }

    if let Ok(secs) = env::var("BACKEND_TIMEOUT_SECS") {
        let secs: u64 = secs
            .parse()
            .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?;
        config.backend_timeout = Duration::from_secs(secs);
    }

    if let Ok(secure) = env::var("SESSION_COOKIE_SECURE") {
        config.cookie_secure = secure
            .parse()
            .context("SESSION_COOKIE_SECURE must be true or false")?;
    }
    if !config.cookie_secure {
        tracing::warn!("Session cookie is sent without the Secure attribute");
    }

    Ok(config)
}
