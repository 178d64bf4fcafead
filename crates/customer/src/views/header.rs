//! Site header for the marketing pages.

use askama::Template;

use crate::routes::Page;

/// One navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: String,
}

/// Header with the brand and navigation links.
#[derive(Debug, Clone, Template)]
#[template(path = "header.txt")]
pub struct Header {
    pub brand: String,
    pub links: Vec<NavLink>,
}

impl Header {
    pub const BRAND: &'static str = "Laundry Hub";

    /// Build the header. Logged-in customers get a Dashboard link instead of Login.
    #[must_use]
    pub fn new(shop_slug: Option<&str>, logged_in: bool) -> Self {
        let account = if logged_in { Page::Dashboard } else { Page::Login };
        let links = [Page::Home, Page::About, Page::Services, Page::Prices, account]
            .into_iter()
            .map(|page| NavLink {
                label: page.title(),
                href: page.link(shop_slug),
            })
            .collect();

        Self {
            brand: shop_slug.map_or_else(|| Self::BRAND.to_string(), |slug| slug.to_uppercase()),
            links,
        }
    }
}
