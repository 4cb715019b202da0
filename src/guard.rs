//! Route authorization rules.
//!
//! Every screen belongs to a [`PageClass`]; [`decide`] turns the current viewer and
//! the requested path into an [`AccessDecision`]. The rules are pure so the router
//! middleware, the dashboard navigation and the tests all share one definition.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::UserInfo;

/// Role
///
/// The closed set of roles the storefront distinguishes. A viewer holding neither
/// `Admin` nor `Seller` is a customer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Role {
    Admin,
    Seller,
    User,
}

impl Role {
    /// Parses a backend role tag. Accepts both `ROLE_ADMIN` and `ADMIN` spellings,
    /// case-insensitively. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_uppercase();
        match tag.strip_prefix("ROLE_").unwrap_or(&tag) {
            "ADMIN" => Some(Role::Admin),
            "SELLER" => Some(Role::Seller),
            "USER" => Some(Role::User),
            _ => None,
        }
    }
}

/// Viewer
///
/// Identity of whoever is driving the current session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Viewer {
    pub is_authenticated: bool,
    pub roles: BTreeSet<Role>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            is_authenticated: true,
            roles: roles.into_iter().collect(),
        }
    }

    /// Builds the viewer from the auth slice. No user means anonymous.
    pub fn from_user(user: Option<&UserInfo>) -> Self {
        match user {
            Some(user) => Self::authenticated(user.roles.iter().filter_map(|t| Role::from_tag(t))),
            None => Self::anonymous(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Seller without the admin role.
    pub fn is_seller_only(&self) -> bool {
        self.has_role(Role::Seller) && !self.is_admin()
    }
}

/// PageClass
///
/// Access category of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum PageClass {
    /// Login / register: only for viewers who are not signed in.
    Public,
    /// Admin dashboard: admin, or seller within the allow-list.
    Restricted,
    /// Checkout / profile: any signed-in viewer.
    Authenticated,
}

/// NavigationRequest
///
/// One navigation attempt, built by the router per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub target_path: String,
    pub page_class: PageClass,
}

impl NavigationRequest {
    pub fn new(target_path: impl Into<String>, page_class: PageClass) -> Self {
        Self {
            target_path: target_path.into(),
            page_class,
        }
    }
}

/// AccessDecision
///
/// Outcome of the guard for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum AccessDecision {
    Allow,
    RedirectHome,
    RedirectLogin,
}

impl AccessDecision {
    /// Location the router sends the viewer to, `None` when the screen renders.
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::RedirectHome => Some("/"),
            AccessDecision::RedirectLogin => Some("/login"),
        }
    }
}

/// decide
///
/// Decides whether `viewer` may open `target_path` of class `page_class`.
/// `seller_allowed_prefixes` lists the restricted paths a seller without the admin
/// role may reach.
pub fn decide<S: AsRef<str>>(
    viewer: &Viewer,
    page_class: PageClass,
    target_path: &str,
    seller_allowed_prefixes: &[S],
) -> AccessDecision {
    match page_class {
        PageClass::Public => {
            if viewer.is_authenticated {
                AccessDecision::RedirectHome
            } else {
                AccessDecision::Allow
            }
        }
        PageClass::Restricted => {
            if !viewer.has_role(Role::Admin) && !viewer.has_role(Role::Seller) {
                AccessDecision::RedirectHome
            } else if viewer.is_seller_only() {
                if seller_may_open(target_path, seller_allowed_prefixes) {
                    AccessDecision::Allow
                } else {
                    AccessDecision::RedirectHome
                }
            } else {
                AccessDecision::Allow
            }
        }
        PageClass::Authenticated => {
            if viewer.is_authenticated {
                AccessDecision::Allow
            } else {
                AccessDecision::RedirectLogin
            }
        }
    }
}

/// Convenience wrapper over [`decide`] for a prepared [`NavigationRequest`].
pub fn decide_navigation<S: AsRef<str>>(
    viewer: &Viewer,
    request: &NavigationRequest,
    seller_allowed_prefixes: &[S],
) -> AccessDecision {
    decide(
        viewer,
        request.page_class,
        &request.target_path,
        seller_allowed_prefixes,
    )
}

fn seller_may_open<S: AsRef<str>>(target_path: &str, prefixes: &[S]) -> bool {
    prefixes
        .iter()
        .any(|prefix| target_path.starts_with(prefix.as_ref()))
}
