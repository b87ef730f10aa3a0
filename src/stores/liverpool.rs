use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::form_urlencoded;

use super::{parse_product_tiles, StoreScraper, TileSelectors};
use crate::models::{ProductRecord, StoreId};
use crate::AppError;
use crate::Result;

const BASE_URL: &str = "https://www.liverpool.com.mx";

const TILE: &str = "li.m-product__card";
const NAME: &str = "h5.a-card-title";
const PRICE: &str = "span.a-card-price__sale";
const REGULAR_PRICE: &str = "span.a-card-price__regular";
const DISCOUNT: &str = "span.a-card-badge";

/// Liverpool department-store search.
pub struct LiverpoolStore {
    base_url: String,
    selectors: TileSelectors,
}

impl LiverpoolStore {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Points the handler at a different host, for tests.
    pub fn with_base_url(base_url: &str) -> Self {
        LiverpoolStore {
            base_url: base_url.trim_end_matches('/').to_string(),
            selectors: TileSelectors::new(TILE, NAME, PRICE, REGULAR_PRICE, DISCOUNT),
        }
    }
}

impl Default for LiverpoolStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreScraper for LiverpoolStore {
    fn id(&self) -> StoreId {
        StoreId::Liverpool
    }

    fn search_url(&self, term: &str) -> String {
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("s", term)
            .finish();
        format!("{}/tienda?{}", self.base_url, query)
    }

    async fn fetch(&self, client: &Client, term: &str) -> Result<Vec<ProductRecord>> {
        let url = self.search_url(term);
        debug!("Fetching {}", url);

        let response = client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Scraping(format!(
                "liverpool answered HTTP {} for '{}'",
                status, term
            )));
        }

        let body = response.text().await?;
        Ok(parse_product_tiles(self.id(), &body, &self.selectors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn results_page() -> &'static str {
        r#"
        <html><body><ul>
            <li class="m-product__card">
                <h5 class="a-card-title">Rompope Santa Clara vainilla 1 L</h5>
                <span class="a-card-price__sale">$119.00</span>
                <span class="a-card-price__regular">$170.00</span>
                <span class="a-card-badge">30% off</span>
            </li>
            <li class="m-product__card">
                <h5 class="a-card-title">Sidra Valle Redondo 750 ml</h5>
                <span class="a-card-price__sale">$85.00</span>
            </li>
        </ul></body></html>
        "#
    }

    #[test]
    fn test_search_url_encodes_term() {
        let store = LiverpoolStore::new();
        assert_eq!(
            store.search_url("rompope"),
            "https://www.liverpool.com.mx/tienda?s=rompope"
        );
    }

    #[test]
    fn test_parses_results_page() {
        let store = LiverpoolStore::new();
        let records = parse_product_tiles(store.id(), results_page(), &store.selectors);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Rompope Santa Clara vainilla 1 L");
        assert_eq!(records[0].store, StoreId::Liverpool);
        assert_eq!(records[0].price, Decimal::from(119));
        assert_eq!(records[0].regular_price, Decimal::from(170));
        assert_eq!(records[0].discount, Some(Decimal::from(30)));
        assert_eq!(records[1].regular_price, records[1].price);
    }
}
