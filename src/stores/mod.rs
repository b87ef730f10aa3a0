use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

use crate::models::{ProductRecord, StoreId};
use crate::Result;

pub mod chedraui;
pub mod liverpool;
pub mod walmart;

pub use chedraui::ChedrauiStore;
pub use liverpool::LiverpoolStore;
pub use walmart::WalmartStore;

/// One search-capable store front. Implementations own their base URL and
/// tile selectors; the collector drives them per search term.
#[async_trait]
pub trait StoreScraper: Send + Sync {
    fn id(&self) -> StoreId;

    /// Full search-results URL for a term, query already encoded.
    fn search_url(&self, term: &str) -> String;

    /// Fetch one page of search results and parse it into records.
    async fn fetch(&self, client: &Client, term: &str) -> Result<Vec<ProductRecord>>;
}

/// Maps the configured store set to its handlers, in configuration order.
pub fn build_stores(ids: &[StoreId]) -> Vec<Box<dyn StoreScraper>> {
    ids.iter()
        .map(|id| match id {
            StoreId::Walmart => Box::new(WalmartStore::new()) as Box<dyn StoreScraper>,
            StoreId::Liverpool => Box::new(LiverpoolStore::new()) as Box<dyn StoreScraper>,
            StoreId::Chedraui => Box::new(ChedrauiStore::new()) as Box<dyn StoreScraper>,
        })
        .collect()
}

/// CSS selectors for one store's search-results markup.
pub(crate) struct TileSelectors {
    tile: Selector,
    name: Selector,
    price: Selector,
    regular_price: Selector,
    discount: Selector,
}

impl TileSelectors {
    /// Callers pass literal patterns, so parse failures are programmer
    /// errors and unwrapping is fine.
    pub(crate) fn new(
        tile: &str,
        name: &str,
        price: &str,
        regular_price: &str,
        discount: &str,
    ) -> Self {
        TileSelectors {
            tile: Selector::parse(tile).unwrap(),
            name: Selector::parse(name).unwrap(),
            price: Selector::parse(price).unwrap(),
            regular_price: Selector::parse(regular_price).unwrap(),
            discount: Selector::parse(discount).unwrap(),
        }
    }
}

/// Walks a results page tile by tile. Tiles without a product name are
/// skipped; a missing offer price becomes zero (the analyzer's
/// insufficient-data path); a missing list price falls back to the offer
/// price (no discount, but still a valid record).
pub(crate) fn parse_product_tiles(
    store: StoreId,
    html: &str,
    selectors: &TileSelectors,
) -> Vec<ProductRecord> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for tile in document.select(&selectors.tile) {
        let Some(name) = element_text(&tile, &selectors.name) else {
            continue;
        };

        let price = element_text(&tile, &selectors.price)
            .map(|text| parse_price(&text))
            .unwrap_or(Decimal::ZERO);
        let regular_price = element_text(&tile, &selectors.regular_price)
            .map(|text| parse_price(&text))
            .unwrap_or(price);
        let discount =
            element_text(&tile, &selectors.discount).and_then(|text| parse_discount(&text));

        records.push(ProductRecord {
            name,
            store,
            regular_price,
            price,
            discount,
        });
    }

    records
}

/// Trimmed inner text of the first selector match inside a tile.
fn element_text(tile: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    let text: String = tile.select(selector).next()?.text().collect();
    let text = text.trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

/// First `$1,234.56`-style amount in a text fragment, zero when none.
pub(crate) fn parse_price(text: &str) -> Decimal {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"\$?\s*(\d{1,3}(?:,\d{3})*(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)").unwrap()
    });

    re.captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|amount| amount.as_str().replace(',', "").parse().ok())
        .unwrap_or(Decimal::ZERO)
}

/// Percentage out of a discount badge like `-25%` or `Ahorra 25%`.
pub(crate) fn parse_discount(text: &str) -> Option<Decimal> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").unwrap());

    re.captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|amount| amount.as_str().parse().ok())
}
