use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::form_urlencoded;

use super::{parse_product_tiles, StoreScraper, TileSelectors};
use crate::models::{ProductRecord, StoreId};
use crate::AppError;
use crate::Result;

const BASE_URL: &str = "https://www.chedraui.com.mx";

// Chedraui runs on VTEX, hence the verbose class names.
const TILE: &str = "section.vtex-product-summary-2-x-container";
const NAME: &str = "span.vtex-product-summary-2-x-productBrand";
const PRICE: &str = "span.vtex-product-price-1-x-sellingPriceValue";
const REGULAR_PRICE: &str = "span.vtex-product-price-1-x-listPriceValue";
const DISCOUNT: &str = "span.vtex-product-price-1-x-savingsPercentage";

/// Chedraui supermarket search.
pub struct ChedrauiStore {
    base_url: String,
    selectors: TileSelectors,
}

impl ChedrauiStore {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Points the handler at a different host, for tests.
    pub fn with_base_url(base_url: &str) -> Self {
        ChedrauiStore {
            base_url: base_url.trim_end_matches('/').to_string(),
            selectors: TileSelectors::new(TILE, NAME, PRICE, REGULAR_PRICE, DISCOUNT),
        }
    }
}

impl Default for ChedrauiStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreScraper for ChedrauiStore {
    fn id(&self) -> StoreId {
        StoreId::Chedraui
    }

    fn search_url(&self, term: &str) -> String {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("q", term)
            .finish();
        format!("{}/search?{}", self.base_url, query)
    }

    async fn fetch(&self, client: &Client, term: &str) -> Result<Vec<ProductRecord>> {
        let url = self.search_url(term);
        debug!("Fetching {}", url);

        let response = client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Scraping(format!(
                "chedraui answered HTTP {} for '{}'",
                status, term
            )));
        }

        let body = response.text().await?;
        Ok(parse_product_tiles(self.id(), &body, &self.selectors))
    }
}
