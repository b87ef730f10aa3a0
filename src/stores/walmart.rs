use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::form_urlencoded;

use super::{parse_product_tiles, StoreScraper, TileSelectors};
use crate::models::{ProductRecord, StoreId};
use crate::AppError;
use crate::Result;

const BASE_URL: &str = "https://super.walmart.com.mx";

const TILE: &str = "div[data-item-id]";
const NAME: &str = r#"span[data-automation-id="product-title"]"#;
const PRICE: &str = r#"div[data-automation-id="product-price"] span.price-main"#;
const REGULAR_PRICE: &str = r#"div[data-automation-id="product-price"] span.price-was"#;
const DISCOUNT: &str = "span.price-savings";

/// Walmart México grocery search.
pub struct WalmartStore {
    base_url: String,
    selectors: TileSelectors,
}

impl WalmartStore {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Points the handler at a different host, for tests.
    pub fn with_base_url(base_url: &str) -> Self {
        WalmartStore {
            base_url: base_url.trim_end_matches('/').to_string(),
            selectors: TileSelectors::new(TILE, NAME, PRICE, REGULAR_PRICE, DISCOUNT),
        }
    }
}

impl Default for WalmartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreScraper for WalmartStore {
    fn id(&self) -> StoreId {
        StoreId::Walmart
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
                "walmart answered HTTP {} for '{}'",
                status, term
            )));
        }

        let body = response.text().await?;
        Ok(parse_product_tiles(self.id(), &body, &self.selectors))
    }
}
