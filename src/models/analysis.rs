use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ProductRecord, StoreId};

/// Metrics computed for one product, rounded to one decimal place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub discount_real: Decimal,
    pub margin: Decimal,
    pub roi: Decimal,
    pub approved: bool,
    pub analysis_date: DateTime<Utc>,
}

/// A product that cleared every threshold, flattened together with its
/// analysis so a CSV row carries both. The `csv` serializer cannot handle
/// nested structs, hence the flat copy instead of serde(flatten).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApprovedProduct {
    pub name: String,
    pub store: StoreId,
    pub regular_price: Decimal,
    pub price: Decimal,
    pub discount: Option<Decimal>,
    pub discount_real: Decimal,
    pub margin: Decimal,
    pub roi: Decimal,
    pub approved: bool,
    pub analysis_date: DateTime<Utc>,
}

impl ApprovedProduct {
    pub fn new(record: &ProductRecord, analysis: &AnalysisResult) -> Self {
        ApprovedProduct {
            name: record.name.clone(),
            store: record.store,
            regular_price: record.regular_price,
            price: record.price,
            discount: record.discount,
            discount_real: analysis.discount_real,
            margin: analysis.margin,
            roi: analysis.roi,
            approved: analysis.approved,
            analysis_date: analysis.analysis_date,
        }
    }

    /// Amount saved against the list price if bought at the offer price.
    pub fn potential_saving(&self) -> Decimal {
        self.regular_price - self.price
    }
}
