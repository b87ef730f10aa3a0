use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::StoreId;

/// One product as scraped from a store's search results. Lives in memory
/// for a single cycle; the found-products CSV is its only durable form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub store: StoreId,
    pub regular_price: Decimal,
    pub price: Decimal,
    /// Store-reported discount badge, when the tile carries one. The
    /// analyzer ignores it and recomputes the discount from the two prices.
    pub discount: Option<Decimal>,
}

impl ProductRecord {
    /// Amount saved against the list price if bought at the offer price.
    pub fn potential_saving(&self) -> Decimal {
        self.regular_price - self.price
    }
}
