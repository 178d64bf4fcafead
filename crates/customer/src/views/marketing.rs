//! Static marketing pages.

use askama::Template;

use laundry_core::Amount;

use crate::routes::Page;

#[derive(Debug, Clone, Template)]
#[template(path = "home.txt")]
pub struct HomeView {
    pub register_href: String,
    pub prices_href: String,
}

impl HomeView {
    #[must_use]
    pub fn new(shop_slug: Option<&str>) -> Self {
        Self {
            register_href: Page::Register.link(shop_slug),
            prices_href: Page::Prices.link(shop_slug),
        }
    }
}

#[derive(Debug, Clone, Template)]
#[template(path = "about.txt")]
pub struct AboutView {
    pub brand: String,
}

impl AboutView {
    #[must_use]
    pub fn new(brand: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
        }
    }
}

#[derive(Debug, Clone, Template)]
#[template(path = "services.txt")]
pub struct ServicesView {
    pub services: Vec<(&'static str, &'static str)>,
}

impl Default for ServicesView {
    fn default() -> Self {
        Self {
            services: vec![
                ("Wash & Fold", "Machine wash, tumble dry and neatly folded."),
                ("Wash & Press", "Washed, dried and steam pressed on hangers."),
                ("Dry Cleaning", "Solvent cleaning for delicate fabrics."),
                ("Pick-up & Delivery", "We collect and return within the city."),
            ],
        }
    }
}

/// A line of the price list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRow {
    pub service: &'static str,
    pub unit: &'static str,
    pub price: Amount,
}

#[derive(Debug, Clone, Template)]
#[template(path = "prices.txt")]
pub struct PricesView {
    pub rows: Vec<PriceRow>,
}

impl Default for PricesView {
    fn default() -> Self {
        let row = |service, unit, centavos| PriceRow {
            service,
            unit,
            price: Amount::from_centavos(centavos),
        };
        Self {
            rows: vec![
                row("Wash & Fold", "per 8 kg load", 18_000),
                row("Wash & Press", "per 8 kg load", 25_000),
                row("Comforter", "per piece", 22_000),
                row("Dry Cleaning", "per piece", 15_000),
                row("Delivery", "per trip", 5_000),
            ],
        }
    }
}
