use async_trait::async_trait;
use chrono::Local;
use lettre::message::{header, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use rust_decimal::Decimal;

use super::{NotificationChannel, NotificationDigest};
use crate::config::EmailConfig;
use crate::AppError;
use crate::Result;

/// Emails the cycle digest as an HTML table with a plain-text fallback.
pub struct EmailChannel {
    config: EmailConfig,
}

impl EmailChannel {
    pub fn new(config: &EmailConfig) -> Self {
        EmailChannel {
            config: config.clone(),
        }
    }

    fn format_subject(&self, digest: &NotificationDigest<'_>) -> String {
        format!(
            "[RETAIL ARBITRAGE] {} Productos Aprobados - {}",
            digest.products.len(),
            Local::now().format("%Y-%m-%d")
        )
    }

    fn format_html_body(&self, digest: &NotificationDigest<'_>) -> String {
        let mut html = String::new();

        html.push_str(&format!(
            r#"<html>
  <body>
    <h2>🛒 Retail Arbitrage Bot - Productos Aprobados</h2>
    <p>Se encontraron <strong>{}</strong> productos que cumplen los criterios de rentabilidad.</p>
    <table border="1" style="border-collapse: collapse; width: 100%;">
      <tr style="background-color: #21808d; color: white;">
        <th style="padding: 8px;">Producto</th>
        <th style="padding: 8px;">Tienda</th>
        <th style="padding: 8px;">Precio</th>
        <th style="padding: 8px;">Descuento</th>
        <th style="padding: 8px;">ROI</th>
      </tr>
"#,
            digest.products.len()
        ));

        for product in digest.products {
            html.push_str(&format!(
                r#"      <tr>
        <td style="padding: 8px;">{}</td>
        <td style="padding: 8px;">{}</td>
        <td style="padding: 8px;">${:.2}</td>
        <td style="padding: 8px; color: red;">{:.1}%</td>
        <td style="padding: 8px;">{:.1}%</td>
      </tr>
"#,
                product.name,
                product.store,
                product.price,
                product.discount.unwrap_or(Decimal::ZERO),
                product.roi
            ));
        }

        html.push_str(&format!(
            r#"    </table>
    <p><strong>Ahorro Total Potencial: ${:.2}</strong></p>
    <p>Fecha: {}</p>
    <hr>
    <p style="font-size: 12px; color: gray;">
      Este es un mensaje automático del Retail Arbitrage Bot.
      No responder a este email.
    </p>
  </body>
</html>
"#,
            digest.total_savings,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        html
    }

    fn format_text_body(&self, digest: &NotificationDigest<'_>) -> String {
        let mut text = String::new();

        text.push_str("🛒 RETAIL ARBITRAGE BOT - PRODUCTOS APROBADOS\n\n");
        text.push_str(&format!(
            "Se encontraron {} productos que cumplen los criterios de rentabilidad.\n\n",
            digest.products.len()
        ));

        for product in digest.products {
            text.push_str(&format!(
                "- {} | {} | ${:.2} | descuento {:.1}% | ROI {:.1}%\n",
                product.name,
                product.store,
                product.price,
                product.discount.unwrap_or(Decimal::ZERO),
                product.roi
            ));
        }

        text.push_str(&format!(
            "\nAhorro Total Potencial: ${:.2}\n",
            digest.total_savings
        ));
        text.push_str(&format!(
            "Fecha: {}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        text.push_str("Este es un mensaje automático del Retail Arbitrage Bot. No responder a este email.\n");

        text
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn send(&self, digest: &NotificationDigest<'_>) -> Result<()> {
        let (Some(username), Some(password), Some(to_email)) = (
            self.config.username.as_deref(),
            self.config.password.as_deref(),
            self.config.to_email.as_deref(),
        ) else {
            return Err(AppError::Notification(
                "email channel is missing SMTP credentials".to_string(),
            ));
        };

        // Gmail app passwords are often pasted with their grouping spaces.
        let password = password.replace(' ', "");

        let email = Message::builder()
            .from(username.parse()?)
            .to(to_email.parse()?)
            .subject(self.format_subject(digest))
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(self.format_text_body(digest)),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(self.format_html_body(digest)),
                    ),
            )?;

        let credentials = Credentials::new(username.to_string(), password);
        let mailer = SmtpTransport::relay(&self.config.smtp_host)?
            .port(self.config.smtp_port)
            .credentials(credentials)
            .build();

        mailer.send(&email)?;
        Ok(())
    }
}
