//! Role → Route Table
//!
//! Static configuration: each role's dashboard base path ("home"), the
//! pages mounted under it, and its sidebar navigation entries. The gate
//! reads it for redirect targets and the layout reads it for menus.
//!
//! [`RouteTable::standard`] is built from an exhaustive match, so every
//! role has an entry. Tables assembled by hand with
//! [`RouteTable::from_sections`] may be partial; lookups then return
//! `None` and the gate fails closed to the login page.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::value_object::user_role::UserRole;

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/customers";
pub const PUBLIC_HOME_PATH: &str = "/";
pub const LEGACY_DASHBOARD_PATH: &str = "/dashboard";

/// Icon keys understood by the navigation chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavIcon {
    Dashboard,
    Users,
    BloodBank,
    Report,
    BloodStock,
    Donation,
    Request,
    Calendar,
    History,
    Hospital,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub label: &'static str,
    pub path: &'static str,
    pub icon: NavIcon,
}

/// A page mounted under a role's home path. The empty slug is the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionPage {
    pub slug: &'static str,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSection {
    pub role: UserRole,
    pub home_path: &'static str,
    pub pages: Vec<SectionPage>,
    pub nav: Vec<NavEntry>,
}

impl RoleSection {
    /// Look up a page by the path below `home_path`.
    ///
    /// `""` and `"/"` both resolve to the dashboard; trailing slashes are
    /// ignored.
    pub fn page(&self, sub_path: &str) -> Option<&SectionPage> {
        let slug = sub_path.trim_matches('/');
        self.pages.iter().find(|p| p.slug == slug)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    sections: BTreeMap<UserRole, RoleSection>,
}

impl RouteTable {
    /// The portal's built-in table. Covers every role.
    pub fn standard() -> Self {
        Self::from_sections(UserRole::ALL.into_iter().map(standard_section))
    }

    /// Table from explicit sections. Later duplicates replace earlier ones.
    pub fn from_sections(sections: impl IntoIterator<Item = RoleSection>) -> Self {
        Self {
            sections: sections.into_iter().map(|s| (s.role, s)).collect(),
        }
    }

    pub fn section(&self, role: UserRole) -> Option<&RoleSection> {
        self.sections.get(&role)
    }

    pub fn home_path(&self, role: UserRole) -> Option<&'static str> {
        self.section(role).map(|s| s.home_path)
    }

    pub fn sections(&self) -> impl Iterator<Item = &RoleSection> {
        self.sections.values()
    }

    /// Roles with no entry. Empty for [`RouteTable::standard`].
    pub fn missing_roles(&self) -> Vec<UserRole> {
        UserRole::ALL
            .into_iter()
            .filter(|role| !self.sections.contains_key(role))
            .collect()
    }
}

const fn page(slug: &'static str, title: &'static str) -> SectionPage {
    SectionPage { slug, title }
}

const fn nav(label: &'static str, path: &'static str, icon: NavIcon) -> NavEntry {
    NavEntry { label, path, icon }
}

fn standard_section(role: UserRole) -> RoleSection {
    use NavIcon::*;

    let (home_path, pages, nav) = match role {
        UserRole::Admin => (
            "/admin",
            vec![page("", "Admin Dashboard")],
            vec![
                nav("Dashboard", "/admin", Dashboard),
                nav("Manage Users", "/admin/users", Users),
                nav("Blood Banks", "/admin/blood-banks", BloodBank),
                nav("Reports", "/admin/reports", Report),
            ],
        ),
        UserRole::BloodBank => (
            "/blood-bank",
            vec![
                page("", "Blood Bank Dashboard"),
                page("requests", "Blood Requests"),
                page("staff", "Staff Management"),
            ],
            vec![
                nav("Dashboard", "/blood-bank", Dashboard),
                nav("Blood Stock", "/blood-bank/stock", BloodStock),
                nav("Donations", "/blood-bank/donations", Donation),
                nav("Requests", "/blood-bank/requests", Request),
                nav("Staff Management", "/blood-bank/staff", Users),
            ],
        ),
        UserRole::Staff => (
            "/staff",
            vec![page("", "Staff Dashboard")],
            vec![
                nav("Dashboard", "/staff", Dashboard),
                nav("Manage Donations", "/staff/donations", Donation),
                nav("Handle Requests", "/staff/requests", Request),
            ],
        ),
        UserRole::Donor => (
            "/donor",
            vec![page("", "Donor Dashboard")],
            vec![
                nav("Dashboard", "/donor", Dashboard),
                nav("Donation History", "/donor/history", History),
                nav("Schedule Donation", "/donor/schedule", Calendar),
            ],
        ),
        UserRole::Consumer => (
            "/consumers",
            vec![page("", "Consumer Dashboard")],
            vec![
                nav("Dashboard", "/consumers", Dashboard),
                nav("Blood Requests", "/consumers/request-blood", Request),
                nav("Request Blood", "/consumers/request", Request),
                nav("Request History", "/consumers/history", History),
            ],
        ),
        UserRole::Hospital => (
            "/hospital",
            vec![
                page("", "Hospital Dashboard"),
                page("requests", "Blood Requests"),
                page("staff", "Staff Management"),
            ],
            vec![
                nav("Dashboard", "/hospital", Dashboard),
                nav("Hospital Management", "/hospital/manage", Hospital),
                nav("Staff Management", "/hospital/staff", Users),
                nav("Blood Requests", "/hospital/requests", Request),
            ],
        ),
        UserRole::Customer => (
            "/customer",
            vec![
                page("", "Customer Dashboard"),
                page("donations", "My Donations"),
                page("requests", "My Requests"),
                page("request-blood", "Request Blood"),
                page("profile", "Profile"),
            ],
            vec![
                nav("Dashboard", "/customer", Dashboard),
                nav("Profile", "/customer/profile", Profile),
                nav("Request History", "/customer/requests", History),
                nav("Donation History", "/customer/donations", History),
            ],
        ),
    };

    RoleSection {
        role,
        home_path,
        pages,
        nav,
    }
}
