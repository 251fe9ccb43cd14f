//! API DTOs and view descriptions

use serde::{Deserialize, Serialize};

use crate::domain::route_table::{NavEntry, RoleSection, SectionPage};
use crate::domain::value_object::user_role::UserRole;

// ============================================================================
// Login / Logout
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub role: UserRole,
    pub redirect_to: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub redirect_to: String,
}

// ============================================================================
// Session Status
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub role: Option<UserRole>,
    pub home_path: Option<String>,
}

// ============================================================================
// Sign Up
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub message: String,
}

// ============================================================================
// Page views
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Marketing chrome, no sidebar
    Public,
    /// Authenticated chrome: role sidebar + content area
    Dashboard,
}

/// What the client should render for a navigation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub layout: Layout,
    pub title: &'static str,
    /// Content key; the dashboard page slug or the public page name
    pub page: &'static str,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    pub nav: Vec<NavEntry>,
}

impl PageView {
    pub fn public(page: &'static str, title: &'static str, path: impl Into<String>) -> Self {
        Self {
            layout: Layout::Public,
            title,
            page,
            path: path.into(),
            role: None,
            nav: Vec::new(),
        }
    }

    pub fn dashboard(section: &RoleSection, page: &SectionPage, path: impl Into<String>) -> Self {
        Self {
            layout: Layout::Dashboard,
            title: page.title,
            page: page.slug,
            path: path.into(),
            role: Some(section.role),
            nav: section.nav.clone(),
        }
    }
}
