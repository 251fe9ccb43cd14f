//! Application Configuration
//!
//! Configuration for the session store, the session cookie, the gate and
//! the backend gateway.

use std::time::Duration;

use platform::cookie::{CookieConfig, SameSite};

use crate::domain::route_table::{LOGIN_PATH, PUBLIC_HOME_PATH, SIGNUP_PATH};

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Storage key holding the bearer token
    pub token_key: String,
    /// Storage key holding the user type code
    pub role_key: String,
    /// Cookie carrying the opaque session id
    pub session_cookie_name: String,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Base URL of the blood-bank REST API
    pub backend_api_url: String,
    /// Per-request timeout for backend calls
    pub backend_timeout: Duration,
    /// Where unauthenticated visitors are sent
    pub login_path: String,
    pub signup_path: String,
    /// Target of the catch-all redirect
    pub public_home_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_key: "authToken".to_string(),
            role_key: "userType".to_string(),
            session_cookie_name: "portal_session".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            backend_api_url: "https://raktkadi.onrender.com/api".to_string(),
            backend_timeout: Duration::from_secs(15),
            login_path: LOGIN_PATH.to_string(),
            signup_path: SIGNUP_PATH.to_string(),
            public_home_path: PUBLIC_HOME_PATH.to_string(),
        }
    }
}

impl AuthConfig {
    /// Session cookie settings. HttpOnly, scoped to the whole site, and
    /// without `Max-Age` so it ends with the browser session.
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}
