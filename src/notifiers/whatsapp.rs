use async_trait::async_trait;
use reqwest::Client;

use super::{NotificationChannel, NotificationDigest};
use crate::config::WhatsAppConfig;
use crate::AppError;
use crate::Result;

const BASE_URL: &str = "https://api.callmebot.com";

/// Sends a short cycle summary over WhatsApp through the CallMeBot API.
pub struct WhatsAppChannel {
    config: WhatsAppConfig,
    base_url: String,
    client: Client,
}

impl WhatsAppChannel {
    pub fn new(config: &WhatsAppConfig) -> Self {
        Self::with_base_url(config, BASE_URL)
    }

    /// Points the channel at a different API host, for tests.
    pub fn with_base_url(config: &WhatsAppConfig, base_url: &str) -> Self {
        WhatsAppChannel {
            config: config.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    fn format_message(&self, digest: &NotificationDigest<'_>) -> String {
        let mut message = String::new();

        message.push_str("🛒 *RETAIL ARBITRAGE BOT*\n");
        message.push_str("🏆 *Mejores Oportunidades del Día*\n\n");
        message.push_str(&format!(
            "✅ Productos encontrados: {}\n",
            digest.products.len()
        ));
        if let Some(best) = digest.best {
            message.push_str(&format!("📈 Mejor ROI: {} ({:.1}%)\n", best.name, best.roi));
        }
        message.push_str(&format!("💵 Ahorro total: ${:.2}\n\n", digest.total_savings));
        message.push_str("🔗 Revisa el email para más detalles\n");
        message.push_str("_Bot Automatizado_");

        message
    }
}

#[async_trait]
impl NotificationChannel for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn send(&self, digest: &NotificationDigest<'_>) -> Result<()> {
        let (Some(phone), Some(api_key)) = (
            self.config.phone.as_deref(),
            self.config.api_key.as_deref(),
        ) else {
            return Err(AppError::Notification(
                "whatsapp channel is missing phone or API key".to_string(),
            ));
        };

        let message = self.format_message(digest);
        let url = format!("{}/whatsapp.php", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("phone", phone),
                ("text", message.as_str()),
                ("apikey", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Notification(format!(
                "callmebot answered HTTP {}",
                status
            )));
        }

        Ok(())
    }
}
