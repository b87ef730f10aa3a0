use config::{Config, ConfigError, Environment};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::StoreId;

const DEFAULT_SEARCH_QUERY: &str = "sidra,rompope";
const DEFAULT_STORES: &str = "walmart,liverpool";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub analyzer: AnalyzerConfig,
    pub scraper: ScraperConfig,
    pub scheduler: SchedulerConfig,
    pub notifications: NotificationsConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub terms: Vec<String>,
    pub stores: Vec<StoreId>,
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub min_discount: Decimal,
    pub min_margin: Decimal,
    pub min_roi: Decimal,
    pub max_storage_days: u32,
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub max_price: Decimal,
    pub request_delay: u64,
    pub request_timeout: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub check_interval_hours: u64,
}

#[derive(Debug, Clone)]
pub struct NotificationsConfig {
    pub email: EmailConfig,
    pub whatsapp: WhatsAppConfig,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub to_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub phone: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

/// Environment variables as the `config` crate hands them over, before any
/// typed parsing. Every field is optional; defaults live in `from_raw`.
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    search_query: Option<String>,
    stores: Option<String>,
    min_discount: Option<String>,
    min_margin: Option<String>,
    min_roi: Option<String>,
    max_storage_days: Option<String>,
    max_price: Option<String>,
    request_delay: Option<String>,
    request_timeout: Option<String>,
    user_agent: Option<String>,
    check_interval_hours: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    data_dir: Option<String>,
    notify_email: Option<String>,
    notify_phone: Option<String>,
    smtp_host: Option<String>,
    smtp_port: Option<String>,
    smtp_username: Option<String>,
    smtp_password: Option<String>,
    callmebot_apikey: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> crate::Result<Self> {
        let raw: RawSettings = Config::builder()
            .add_source(Environment::default().ignore_empty(true))
            .build()?
            .try_deserialize()?;

        let config = Self::from_raw(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let terms = split_list(raw.search_query.as_deref().unwrap_or(DEFAULT_SEARCH_QUERY));
        let stores = split_list(raw.stores.as_deref().unwrap_or(DEFAULT_STORES))
            .iter()
            .map(|name| name.parse::<StoreId>().map_err(ConfigError::Message))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AppConfig {
            search: SearchConfig { terms, stores },
            analyzer: AnalyzerConfig {
                min_discount: decimal_var(
                    raw.min_discount.as_deref(),
                    Decimal::from(30),
                    "MIN_DISCOUNT",
                )?,
                min_margin: decimal_var(
                    raw.min_margin.as_deref(),
                    Decimal::from(50),
                    "MIN_MARGIN",
                )?,
                min_roi: decimal_var(raw.min_roi.as_deref(), Decimal::from(50), "MIN_ROI")?,
                max_storage_days: parsed_var(
                    raw.max_storage_days.as_deref(),
                    90,
                    "MAX_STORAGE_DAYS",
                )?,
            },
            scraper: ScraperConfig {
                max_price: decimal_var(raw.max_price.as_deref(), Decimal::from(500), "MAX_PRICE")?,
                request_delay: parsed_var(raw.request_delay.as_deref(), 2, "REQUEST_DELAY")?,
                request_timeout: parsed_var(raw.request_timeout.as_deref(), 10, "REQUEST_TIMEOUT")?,
                user_agent: raw
                    .user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            },
            scheduler: SchedulerConfig {
                check_interval_hours: parsed_var(
                    raw.check_interval_hours.as_deref(),
                    6,
                    "CHECK_INTERVAL_HOURS",
                )?,
            },
            notifications: NotificationsConfig {
                email: EmailConfig {
                    smtp_host: raw
                        .smtp_host
                        .unwrap_or_else(|| "smtp.gmail.com".to_string()),
                    smtp_port: parsed_var(raw.smtp_port.as_deref(), 465, "SMTP_PORT")?,
                    username: raw.smtp_username,
                    password: raw.smtp_password,
                    to_email: raw.notify_email,
                },
                whatsapp: WhatsAppConfig {
                    phone: raw.notify_phone,
                    api_key: raw.callmebot_apikey,
                },
            },
            output: OutputConfig {
                data_dir: PathBuf::from(raw.data_dir.unwrap_or_else(|| "data".to_string())),
            },
            logging: LoggingConfig {
                level: raw.log_level.unwrap_or_else(|| "info".to_string()),
                file: raw.log_file.map(PathBuf::from),
            },
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.terms.is_empty() {
            return Err(ConfigError::Message(
                "SEARCH_QUERY must contain at least one search term".into(),
            ));
        }

        if self.search.stores.is_empty() {
            return Err(ConfigError::Message(
                "STORES must contain at least one store".into(),
            ));
        }

        if self.analyzer.max_storage_days == 0 {
            return Err(ConfigError::Message(
                "MAX_STORAGE_DAYS must be greater than 0".into(),
            ));
        }

        if self.scraper.max_price <= Decimal::ZERO {
            return Err(ConfigError::Message(
                "MAX_PRICE must be greater than 0".into(),
            ));
        }

        if self.scraper.request_timeout == 0 {
            return Err(ConfigError::Message(
                "REQUEST_TIMEOUT must be greater than 0".into(),
            ));
        }

        if self.scheduler.check_interval_hours == 0 {
            return Err(ConfigError::Message(
                "CHECK_INTERVAL_HOURS must be greater than 0".into(),
            ));
        }

        if self.notifications.email.smtp_port == 0 {
            return Err(ConfigError::Message(
                "SMTP_PORT must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl NotificationsConfig {
    /// Environment variable names for every credential that is still unset.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.email.to_email.is_none() {
            missing.push("NOTIFY_EMAIL");
        }
        if self.email.username.is_none() {
            missing.push("SMTP_USERNAME");
        }
        if self.email.password.is_none() {
            missing.push("SMTP_PASSWORD");
        }
        if self.whatsapp.phone.is_none() {
            missing.push("NOTIFY_PHONE");
        }
        if self.whatsapp.api_key.is_none() {
            missing.push("CALLMEBOT_APIKEY");
        }
        missing
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn decimal_var(value: Option<&str>, default: Decimal, name: &str) -> Result<Decimal, ConfigError> {
    match value {
        Some(raw) => raw.trim().parse().map_err(|_| {
            ConfigError::Message(format!("{} must be a number, got '{}'", name, raw))
        }),
        None => Ok(default),
    }
}

fn parsed_var<T: FromStr>(value: Option<&str>, default: T, name: &str) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw.trim().parse().map_err(|_| {
            ConfigError::Message(format!("{} must be an integer, got '{}'", name, raw))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            search: SearchConfig {
                terms: vec!["sidra".to_string(), "rompope".to_string()],
                stores: vec![StoreId::Walmart, StoreId::Liverpool],
            },
            analyzer: AnalyzerConfig {
                min_discount: Decimal::from(30),
                min_margin: Decimal::from(50),
                min_roi: Decimal::from(50),
                max_storage_days: 90,
            },
            scraper: ScraperConfig {
                max_price: Decimal::from(500),
                request_delay: 2,
                request_timeout: 10,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            scheduler: SchedulerConfig {
                check_interval_hours: 6,
            },
            notifications: NotificationsConfig {
                email: EmailConfig {
                    smtp_host: "smtp.gmail.com".to_string(),
                    smtp_port: 465,
                    username: Some("bot@gmail.com".to_string()),
                    password: Some("app password".to_string()),
                    to_email: Some("deals@example.com".to_string()),
                },
                whatsapp: WhatsAppConfig {
                    phone: Some("+5215512345678".to_string()),
                    api_key: Some("123456".to_string()),
                },
            },
            output: OutputConfig {
                data_dir: PathBuf::from("data"),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: None,
            },
        }
    }

    #[test]
    fn test_config_validation_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_storage_days() {
        let mut config = valid_config();
        config.analyzer.max_storage_days = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("MAX_STORAGE_DAYS"));
    }

    #[test]
    fn test_config_validation_zero_max_price() {
        let mut config = valid_config();
        config.scraper.max_price = Decimal::ZERO;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("MAX_PRICE"));
    }

    #[test]
    fn test_config_validation_empty_terms() {
        let mut config = valid_config();
        config.search.terms.clear();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("SEARCH_QUERY"));
    }

    #[test]
    fn test_config_validation_zero_smtp_port() {
        let mut config = valid_config();
        config.notifications.email.smtp_port = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("SMTP_PORT"));
    }

    #[test]
    fn test_negative_thresholds_are_allowed() {
        // Zero or negative thresholds are the documented way to make
        // approval reachable despite the degenerate margin, so validation
        // must not reject them.
        let mut config = valid_config();
        config.analyzer.min_margin = Decimal::from(-5);
        config.analyzer.min_roi = Decimal::ZERO;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_raw_defaults() {
        let config = AppConfig::from_raw(RawSettings::default()).unwrap();

        assert_eq!(config.search.terms, vec!["sidra", "rompope"]);
        assert_eq!(
            config.search.stores,
            vec![StoreId::Walmart, StoreId::Liverpool]
        );
        assert_eq!(config.analyzer.min_discount, Decimal::from(30));
        assert_eq!(config.analyzer.min_margin, Decimal::from(50));
        assert_eq!(config.analyzer.min_roi, Decimal::from(50));
        assert_eq!(config.analyzer.max_storage_days, 90);
        assert_eq!(config.scraper.max_price, Decimal::from(500));
        assert_eq!(config.scraper.request_delay, 2);
        assert_eq!(config.scraper.request_timeout, 10);
        assert_eq!(config.scraper.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.scheduler.check_interval_hours, 6);
        assert_eq!(config.notifications.email.smtp_host, "smtp.gmail.com");
        assert_eq!(config.notifications.email.smtp_port, 465);
        assert!(config.notifications.email.username.is_none());
        assert!(config.notifications.whatsapp.api_key.is_none());
        assert_eq!(config.output.data_dir, PathBuf::from("data"));
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_from_raw_bad_number() {
        let raw = RawSettings {
            min_discount: Some("thirty".to_string()),
            ..RawSettings::default()
        };

        let result = AppConfig::from_raw(raw);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("MIN_DISCOUNT"));
    }

    #[test]
    fn test_from_raw_unknown_store() {
        let raw = RawSettings {
            stores: Some("walmart,amazon".to_string()),
            ..RawSettings::default()
        };

        let result = AppConfig::from_raw(raw);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown store identifier 'amazon'"));
    }

    #[test]
    fn test_from_raw_list_parsing() {
        let raw = RawSettings {
            search_query: Some(" sidra , ,rompope ".to_string()),
            stores: Some("Walmart, CHEDRAUI".to_string()),
            ..RawSettings::default()
        };

        let config = AppConfig::from_raw(raw).unwrap();
        assert_eq!(config.search.terms, vec!["sidra", "rompope"]);
        assert_eq!(
            config.search.stores,
            vec![StoreId::Walmart, StoreId::Chedraui]
        );
    }

    #[test]
    fn test_missing_credentials() {
        let config = AppConfig::from_raw(RawSettings::default()).unwrap();
        assert_eq!(
            config.notifications.missing_credentials(),
            vec![
                "NOTIFY_EMAIL",
                "SMTP_USERNAME",
                "SMTP_PASSWORD",
                "NOTIFY_PHONE",
                "CALLMEBOT_APIKEY",
            ]
        );

        let config = valid_config();
        assert!(config.notifications.missing_credentials().is_empty());
    }
}
