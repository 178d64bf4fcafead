//! Path routing for customer pages.
//!
//! # Route Structure
//!
//! ```text
//! /                      - Home
//! /about                 - About the shop
//! /services              - Services offered
//! /prices                - Price list
//! /login                 - Login form
//! /register              - Registration form
//!
//! # Dashboard (requires a session)
//! /dashboard             - Laundry status, payment status, rating
//! /dashboard/profile     - Profile details and editing
//! /dashboard/history     - Past laundry orders
//! /dashboard/payment     - Payment option and proof of payment
//! ```
//!
//! Every path may carry one leading shop slug segment, e.g. `/sudsy/prices`.
//! The marketing header is hidden on the auth forms and the dashboard.

/// A page the router can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    About,
    Services,
    Prices,
    Login,
    Register,
    Dashboard,
    Profile,
    History,
    Payment,
}

impl Page {
    /// Every page, in navigation order.
    pub const ALL: [Self; 10] = [
        Self::Home,
        Self::About,
        Self::Services,
        Self::Prices,
        Self::Login,
        Self::Register,
        Self::Dashboard,
        Self::Profile,
        Self::History,
        Self::Payment,
    ];

    /// Canonical path without a shop slug.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about",
            Self::Services => "/services",
            Self::Prices => "/prices",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/dashboard/profile",
            Self::History => "/dashboard/history",
            Self::Payment => "/dashboard/payment",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Services => "Services",
            Self::Prices => "Prices",
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Dashboard => "Dashboard",
            Self::Profile => "Profile",
            Self::History => "History",
            Self::Payment => "Payment",
        }
    }

    /// Dashboard pages need a logged-in customer.
    #[must_use]
    pub const fn requires_session(self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Profile | Self::History | Self::Payment
        )
    }

    /// Link to this page, prefixed with the shop slug when there is one.
    #[must_use]
    pub fn link(self, shop_slug: Option<&str>) -> String {
        match (shop_slug, self) {
            (None, _) => self.path().to_string(),
            (Some(slug), Self::Home) => format!("/{slug}"),
            (Some(slug), _) => format!("/{slug}{}", self.path()),
        }
    }

    fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.path() == path)
    }
}

/// A resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub page: Page,
    pub shop_slug: Option<String>,
}

/// Paths that hide the marketing header.
const HEADERLESS_EXACT: [&str; 3] = ["/register", "/login", "/dashboard"];
const HEADERLESS_PREFIX: &str = "/dashboard/";

/// Resolve a path to a page.
///
/// Query strings, fragments and trailing slashes are ignored. Returns `None`
/// for unknown paths.
#[must_use]
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = normalize(path);

    if let Some(page) = Page::from_path(&path) {
        return Some(RouteMatch {
            page,
            shop_slug: None,
        });
    }

    let rest = path.strip_prefix('/')?;
    let (slug, tail) = rest.split_once('/').unwrap_or((rest, ""));
    if slug.is_empty() || is_reserved(slug) {
        return None;
    }

    Page::from_path(&format!("/{tail}")).map(|page| RouteMatch {
        page,
        shop_slug: Some(slug.to_string()),
    })
}

/// Whether the marketing header is shown for a path.
#[must_use]
pub fn shows_header(path: &str) -> bool {
    let canonical = resolve(path).map_or_else(|| normalize(path), |m| m.page.path().to_string());
    !(HEADERLESS_EXACT.contains(&canonical.as_str()) || canonical.starts_with(HEADERLESS_PREFIX))
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// A first segment that is itself a page cannot be a shop slug.
fn is_reserved(segment: &str) -> bool {
    Page::ALL
        .iter()
        .any(|page| page.path().trim_start_matches('/').split('/').next() == Some(segment))
}
