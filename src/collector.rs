use reqwest::Client;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{ScraperConfig, SearchConfig};
use crate::models::ProductRecord;
use crate::stores::{build_stores, StoreScraper};
use crate::Result;

/// Runs every configured search term against every configured store and
/// gathers the results into one batch per cycle.
pub struct Collector {
    client: Client,
    stores: Vec<Box<dyn StoreScraper>>,
    terms: Vec<String>,
    max_price: Decimal,
    request_delay: Duration,
}

impl Collector {
    pub fn new(scraper: &ScraperConfig, search: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&scraper.user_agent)
            .timeout(Duration::from_secs(scraper.request_timeout))
            .build()?;

        Ok(Collector {
            client,
            stores: build_stores(&search.stores),
            terms: search.terms.clone(),
            max_price: scraper.max_price,
            request_delay: Duration::from_secs(scraper.request_delay),
        })
    }

    /// Swaps in a custom store set, for tests.
    pub fn with_stores(mut self, stores: Vec<Box<dyn StoreScraper>>) -> Self {
        self.stores = stores;
        self
    }

    /// One full sweep. A failing store/term pair is logged and skipped so
    /// the remaining pairs still run, and the inter-request delay applies
    /// after every pair either way.
    pub async fn collect(&self) -> Vec<ProductRecord> {
        let mut products = Vec::new();

        for store in &self.stores {
            for term in &self.terms {
                match store.fetch(&self.client, term).await {
                    Ok(records) => {
                        let found = records.len();
                        let mut kept = 0;
                        for record in records {
                            if record.price <= self.max_price {
                                products.push(record);
                                kept += 1;
                            }
                        }
                        if kept < found {
                            debug!(
                                "{}: dropped {} products above the ${} cap",
                                store.id(),
                                found - kept,
                                self.max_price
                            );
                        }
                        info!("{}: found {} products for '{}'", store.id(), kept, term);
                    }
                    Err(e) => {
                        warn!("{}: search '{}' failed: {}", store.id(), term, e);
                    }
                }

                tokio::time::sleep(self.request_delay).await;
            }
        }

        products
    }
}
