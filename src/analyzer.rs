use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::models::{AnalysisResult, ProductRecord};

/// Evaluates scraped products against the configured profitability
/// thresholds.
pub struct ProductAnalyzer {
    config: AnalyzerConfig,
}

impl ProductAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        ProductAnalyzer {
            config: config.clone(),
        }
    }

    /// Decides whether a product clears every threshold.
    ///
    /// Returns `None` when the record lacks usable price data (either price
    /// is zero) or a computation fails — "insufficient data", which is a
    /// different outcome from a merit rejection (`Some` with `approved ==
    /// false`). Thresholds are compared against the unrounded metrics; the
    /// returned metrics are rounded to one decimal, half away from zero.
    pub fn evaluate(&self, record: &ProductRecord) -> Option<AnalysisResult> {
        if record.regular_price.is_zero() || record.price.is_zero() {
            debug!("Skipping '{}': missing price data", record.name);
            return None;
        }

        let (discount_real, margin, roi) = match self.compute_metrics(record) {
            Some(metrics) => metrics,
            None => {
                warn!(
                    "Metric computation failed for '{}', treating as missing data",
                    record.name
                );
                return None;
            }
        };

        let approved = discount_real >= self.config.min_discount
            && margin >= self.config.min_margin
            && roi >= self.config.min_roi;

        Some(AnalysisResult {
            discount_real: round_metric(discount_real),
            margin: round_metric(margin),
            roi: round_metric(roi),
            approved,
            analysis_date: Utc::now(),
        })
    }

    fn compute_metrics(&self, record: &ProductRecord) -> Option<(Decimal, Decimal, Decimal)> {
        let discount_real = record
            .regular_price
            .checked_sub(record.price)?
            .checked_div(record.regular_price)?
            .checked_mul(Decimal::ONE_HUNDRED)?;

        // Margin compares the offer price to itself and is always zero; roi
        // inherits the zero. TODO: switch to a cost-basis margin once a
        // per-product purchase cost is available.
        let margin = record
            .price
            .checked_sub(record.price)?
            .checked_div(record.price)?
            .checked_mul(Decimal::ONE_HUNDRED)?;

        let annualization =
            Decimal::from(365).checked_div(Decimal::from(self.config.max_storage_days))?;
        let roi = margin.checked_mul(annualization)?;

        Some((discount_real, margin, roi))
    }
}

fn round_metric(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
