use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{error, info};

use crate::config::NotificationsConfig;
use crate::models::ApprovedProduct;
use crate::Result;

pub mod email;
pub mod whatsapp;

pub use email::EmailChannel;
pub use whatsapp::WhatsAppChannel;

/// Everything a channel needs to render one cycle's summary: the approved
/// batch, the total saving across it, and the single best opportunity.
pub struct NotificationDigest<'a> {
    pub products: &'a [ApprovedProduct],
    pub total_savings: Decimal,
    pub best: Option<&'a ApprovedProduct>,
}

impl<'a> NotificationDigest<'a> {
    pub fn new(products: &'a [ApprovedProduct]) -> Self {
        let total_savings = products.iter().map(|p| p.potential_saving()).sum();

        // First product wins ties so the pick is stable for a given
        // input order.
        let mut best: Option<&'a ApprovedProduct> = None;
        for product in products {
            let replace = match best {
                Some(current) => product.roi > current.roi,
                None => true,
            };
            if replace {
                best = Some(product);
            }
        }

        NotificationDigest {
            products,
            total_savings,
            best,
        }
    }
}

/// One delivery channel for the cycle digest.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, digest: &NotificationDigest<'_>) -> Result<()>;
}

/// Per-channel delivery outcomes for one dispatch.
pub struct DispatchReport {
    pub outcomes: Vec<(String, bool)>,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|(_, ok)| *ok).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

/// Fans the digest out to every configured channel. A channel failure is
/// logged and recorded; it never blocks the other channels.
pub struct Notifier {
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl Notifier {
    pub fn new(config: &NotificationsConfig) -> Self {
        Notifier {
            channels: vec![
                Box::new(EmailChannel::new(&config.email)),
                Box::new(WhatsAppChannel::new(&config.whatsapp)),
            ],
        }
    }

    /// Swaps in a custom channel set, for tests.
    pub fn with_channels(channels: Vec<Box<dyn NotificationChannel>>) -> Self {
        Notifier { channels }
    }

    pub async fn dispatch(&self, products: &[ApprovedProduct]) -> DispatchReport {
        let digest = NotificationDigest::new(products);
        let mut outcomes = Vec::new();

        for channel in &self.channels {
            match channel.send(&digest).await {
                Ok(()) => {
                    info!("{} notification sent", channel.name());
                    outcomes.push((channel.name().to_string(), true));
                }
                Err(e) => {
                    error!("{} notification failed: {}", channel.name(), e);
                    outcomes.push((channel.name().to_string(), false));
                }
            }
        }

        DispatchReport { outcomes }
    }
}
